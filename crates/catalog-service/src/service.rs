//! The browse/search facade over the published tree.
//!
//! Requests run synchronously against the current snapshot. While the
//! coordinator is not Idle (or nothing has been built yet), browse and
//! search return a single placeholder entry instead of blocking.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use catalog_engine::EngineClient;
use catalog_search::SearchTranslator;
use catalog_tree::{
    cmp_entries, doc_to_entry, AddressCodec, NodeAddr, ObjectId, TreeError, TreeSnapshot,
};
use catalog_types::Entry;

use crate::coordinator::{IndexState, RebuildCoordinator, Status};
use crate::error::ServiceError;

/// Name of the folder tree, the primary browse hierarchy.
pub const FOLDERS_TREE: &str = "folders";

/// Name of the tag tree: album, artist and genre containers over the same
/// documents.
pub const TAGS_TREE: &str = "tags";

/// Browse mode: list a container's children or describe one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseFlag {
    Children,
    Metadata,
}

impl FromStr for BrowseFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BrowseDirectChildren" | "children" => Ok(BrowseFlag::Children),
            "BrowseMetadata" | "meta" => Ok(BrowseFlag::Metadata),
            other => Err(format!("unknown browse flag: {other}")),
        }
    }
}

/// Browse, search and status over the coordinator's published tree.
pub struct CatalogService {
    coordinator: Arc<RebuildCoordinator>,
    codec: AddressCodec,
    translator: SearchTranslator,
    engine: Arc<dyn EngineClient>,
}

impl CatalogService {
    pub fn new(
        coordinator: Arc<RebuildCoordinator>,
        codec: AddressCodec,
        engine: Arc<dyn EngineClient>,
    ) -> Self {
        Self {
            coordinator,
            codec,
            translator: SearchTranslator::new(),
            engine,
        }
    }

    /// Identifier of the folder tree root.
    pub fn root_id(&self) -> String {
        self.codec.tree_root(FOLDERS_TREE)
    }

    /// Identifier of the tag tree root.
    pub fn tags_root_id(&self) -> String {
        self.codec.tree_root(TAGS_TREE)
    }

    pub fn status(&self) -> Status {
        self.coordinator.status()
    }

    /// Trigger a background index update (or from-scratch rebuild).
    pub fn start_update(&self, rebuild: bool) -> bool {
        self.coordinator.start(rebuild)
    }

    fn ready(&self) -> Option<Arc<TreeSnapshot>> {
        if self.coordinator.state() != IndexState::Idle {
            return None;
        }
        self.coordinator.snapshot()
    }

    /// The single entry served while the index is not ready.
    fn placeholder(&self, objid: &str) -> Entry {
        let status = self.coordinator.status();
        let title = match status.message {
            Some(message) if !status.ok => format!("Index build failed: {message}"),
            _ => "Initializing...".to_string(),
        };
        Entry::item(&format!("{objid}$0"), objid, &title)
    }

    /// List a container's children or describe one object.
    ///
    /// `count == 0` means all entries from `offset`.
    pub fn browse(
        &self,
        objid: &str,
        flag: BrowseFlag,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Entry>, ServiceError> {
        let Some(snap) = self.ready() else {
            return Ok(vec![self.placeholder(objid)]);
        };
        let id = self.codec.decode(objid)?;
        self.check(objid, &id, &snap)?;

        match flag {
            BrowseFlag::Metadata => Ok(vec![self.metadata(objid, &id, &snap)?]),
            BrowseFlag::Children => {
                let children = self.children(objid, &id, &snap)?;
                Ok(page(children, offset, count))
            }
        }
    }

    /// Bounds-check a decoded identifier against the snapshot, per tree.
    fn check(&self, objid: &str, id: &ObjectId, snap: &TreeSnapshot) -> Result<(), ServiceError> {
        match id.tree.as_str() {
            FOLDERS_TREE => Ok(self.codec.validate(id, snap)?),
            TAGS_TREE => {
                if id.entry.is_some() {
                    return Err(TreeError::InvalidObjectId(format!(
                        "[{objid}] has an entry suffix outside the folder tree"
                    ))
                    .into());
                }
                match id.addr {
                    NodeAddr::Container(n) if n >= snap.tags().node_count() => {
                        Err(TreeError::OutOfBounds(format!(
                            "tag node {n} exceeds tree size {}",
                            snap.tags().node_count()
                        ))
                        .into())
                    }
                    NodeAddr::Item(n) if n >= snap.store().len() => {
                        Err(TreeError::OutOfBounds(format!(
                            "doc {n} exceeds document count {}",
                            snap.store().len()
                        ))
                        .into())
                    }
                    _ => Ok(()),
                }
            }
            other => Err(TreeError::InvalidObjectId(format!(
                "[{objid}] names unknown tree [{other}]"
            ))
            .into()),
        }
    }

    /// Folder-tree container identifier, collapsing node 0 and a single
    /// content root into the bare tree root, matching browse listings.
    fn folders_container_id(&self, n: usize, snap: &TreeSnapshot) -> String {
        let collapsed = snap.roots().len() == 1 && snap.roots()[0].1 == n;
        if n == 0 || collapsed {
            self.codec.tree_root(FOLDERS_TREE)
        } else {
            self.codec.encode(&ObjectId::container(FOLDERS_TREE, n))
        }
    }

    fn metadata(
        &self,
        objid: &str,
        id: &ObjectId,
        snap: &TreeSnapshot,
    ) -> Result<Entry, ServiceError> {
        if id.tree == TAGS_TREE {
            return self.tag_metadata(objid, id, snap);
        }

        if let (Some(entry_idx), NodeAddr::Container(n)) = (id.entry, id.addr) {
            // A playlist entry: describe the document it points at. Its
            // parent is the playlist, the id minus the entry suffix.
            let parent = objid
                .rsplit_once('$')
                .map(|(playlist, _)| playlist.to_string())
                .unwrap_or_else(|| objid.to_string());
            let entry = snap
                .playlist_entries(n)
                .and_then(|entries| entries.get(entry_idx))
                .ok_or_else(|| ServiceError::NotContainer(objid.to_string()))?;
            let doc = snap.store().get(entry.doc);
            return doc
                .and_then(|doc| doc_to_entry(objid, &parent, doc))
                .ok_or_else(|| ServiceError::NotContainer(objid.to_string()));
        }

        match id.addr {
            NodeAddr::Item(doc_idx) => {
                let doc = snap
                    .store()
                    .get(doc_idx)
                    .ok_or_else(|| ServiceError::NotContainer(objid.to_string()))?;
                // The containing folder, found by walking the document's
                // path, not the tree root.
                let parent = snap
                    .parent_of_doc(doc)
                    .map(|n| self.folders_container_id(n, snap))
                    .unwrap_or_else(|| self.codec.tree_root(FOLDERS_TREE));
                doc_to_entry(objid, &parent, doc)
                    .ok_or_else(|| ServiceError::NotContainer(objid.to_string()))
            }
            NodeAddr::Container(0) => Ok(Entry::container(objid, objid, FOLDERS_TREE)),
            NodeAddr::Container(n) => {
                let parent_node = snap.node(n).map(|node| node.parent()).unwrap_or(0);
                let parent = self.folders_container_id(parent_node, snap);
                let dir = snap.dir_path(n);
                let title = dir
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or(FOLDERS_TREE);
                Ok(Entry::container(objid, &parent, title))
            }
        }
    }

    fn children(
        &self,
        objid: &str,
        id: &ObjectId,
        snap: &TreeSnapshot,
    ) -> Result<Vec<Entry>, ServiceError> {
        if id.tree == TAGS_TREE {
            return self.tag_children(objid, id, snap);
        }
        let NodeAddr::Container(mut n) = id.addr else {
            return Err(ServiceError::NotContainer(objid.to_string()));
        };
        if id.entry.is_some() {
            return Err(ServiceError::NotContainer(objid.to_string()));
        }

        // A single content root collapses into the tree root.
        if n == 0 && snap.roots().len() == 1 {
            n = snap.roots()[0].1;
        }

        if snap.is_playlist(n) {
            return Ok(self.playlist_children(objid, &id.tree, n, snap));
        }

        let Some(node) = snap.node(n) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for (name, child) in node.entries() {
            if let Some(cn) = child.node {
                // Directories with no content are not listed; playlist nodes
                // keep their children out of the node map, so they are.
                let empty = snap.node(cn).map(|c| c.is_empty()).unwrap_or(true);
                if empty && !snap.is_playlist(cn) {
                    continue;
                }
                let child_id = self.codec.encode(&ObjectId::container(&id.tree, cn));
                // Root children are keyed by absolute root paths.
                let title = if n == 0 { basename(name) } else { name };
                out.push(Entry::container(&child_id, objid, title));
            } else if let Some(doc_idx) = child.doc {
                if let Some(doc) = snap.store().get(doc_idx) {
                    let child_id = self.codec.encode(&ObjectId::item(&id.tree, doc_idx));
                    if let Some(entry) = doc_to_entry(&child_id, objid, doc) {
                        out.push(entry);
                    }
                }
            }
        }
        out.sort_by(cmp_entries);
        Ok(out)
    }

    /// Playlist entries keep file order, never re-sorted.
    fn playlist_children(
        &self,
        objid: &str,
        tree: &str,
        n: usize,
        snap: &TreeSnapshot,
    ) -> Vec<Entry> {
        let entries = snap.playlist_entries(n).unwrap_or(&[]);
        let mut out = Vec::with_capacity(entries.len());
        for (i, pe) in entries.iter().enumerate() {
            let Some(doc) = snap.store().get(pe.doc) else {
                continue;
            };
            let child_id = self
                .codec
                .encode(&ObjectId::container(tree, n).with_entry(i));
            if let Some(mut entry) = doc_to_entry(&child_id, objid, doc) {
                if entry.title.is_empty() {
                    entry.title = pe.name.clone();
                }
                out.push(entry);
            }
        }
        out
    }

    /// Children of a tag-tree container: category then value containers,
    /// then the tracks carrying the value.
    fn tag_children(
        &self,
        objid: &str,
        id: &ObjectId,
        snap: &TreeSnapshot,
    ) -> Result<Vec<Entry>, ServiceError> {
        let NodeAddr::Container(n) = id.addr else {
            return Err(ServiceError::NotContainer(objid.to_string()));
        };
        let Some(node) = snap.tags().node(n) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for &child in &node.children {
            if let Some(value) = snap.tags().node(child) {
                let child_id = self.codec.encode(&ObjectId::container(TAGS_TREE, child));
                out.push(Entry::container(&child_id, objid, &value.title));
            }
        }
        for &doc_idx in &node.docs {
            if let Some(doc) = snap.store().get(doc_idx) {
                let child_id = self.codec.encode(&ObjectId::item(TAGS_TREE, doc_idx));
                if let Some(entry) = doc_to_entry(&child_id, objid, doc) {
                    out.push(entry);
                }
            }
        }
        out.sort_by(cmp_entries);
        Ok(out)
    }

    fn tag_metadata(
        &self,
        objid: &str,
        id: &ObjectId,
        snap: &TreeSnapshot,
    ) -> Result<Entry, ServiceError> {
        match id.addr {
            NodeAddr::Item(doc_idx) => {
                let doc = snap
                    .store()
                    .get(doc_idx)
                    .ok_or_else(|| ServiceError::NotContainer(objid.to_string()))?;
                // A track sits under every tag value it carries; report the
                // tag root as its parent.
                doc_to_entry(objid, &self.tags_root_id(), doc)
                    .ok_or_else(|| ServiceError::NotContainer(objid.to_string()))
            }
            NodeAddr::Container(0) => Ok(Entry::container(objid, objid, TAGS_TREE)),
            NodeAddr::Container(n) => {
                let node = snap
                    .tags()
                    .node(n)
                    .ok_or_else(|| ServiceError::NotContainer(objid.to_string()))?;
                let parent = match snap.tags().parent_of(n) {
                    Some(p) if p != 0 => {
                        self.codec.encode(&ObjectId::container(TAGS_TREE, p))
                    }
                    _ => self.tags_root_id(),
                };
                Ok(Entry::container(objid, &parent, &node.title))
            }
        }
    }

    /// Run a search scoped to the browsed container.
    pub fn search(&self, objid: &str, criteria: &str) -> Result<Vec<Entry>, ServiceError> {
        let Some(snap) = self.ready() else {
            return Ok(vec![self.placeholder(objid)]);
        };
        let id = self.codec.decode(objid)?;
        self.check(objid, &id, &snap)?;

        let Some(mut query) = self.translator.translate(criteria)? else {
            return Ok(Vec::new());
        };
        // Tag-tree containers have no filesystem extent, so only folder
        // containers narrow the query.
        if id.tree == FOLDERS_TREE {
            if let NodeAddr::Container(n) = id.addr {
                if n != 0 {
                    let dir = snap.dir_path(n);
                    if dir != "/" {
                        query.push_str(&format!(" dir:\"{dir}\""));
                    }
                }
            }
        }

        let docs = match self.engine.search(&query) {
            Ok(docs) => docs,
            Err(err) => {
                warn!(%err, query, "engine rejected translated query");
                return Ok(Vec::new());
            }
        };

        let mut out = Vec::new();
        for doc in &docs {
            let Some(hit) = snap.locate_doc(doc) else {
                debug!(url = %doc.url, "search hit not in tree, skipping");
                continue;
            };
            // Hits are located in the folders tree whichever tree the
            // search was scoped from.
            if let Some(cn) = hit.node {
                let child_id = self.codec.encode(&ObjectId::container(FOLDERS_TREE, cn));
                let parent_node = snap.node(cn).map(|node| node.parent()).unwrap_or(0);
                let parent = self.folders_container_id(parent_node, &snap);
                out.push(Entry::container(&child_id, &parent, &doc.display_title()));
            } else if let Some(doc_idx) = hit.doc {
                if let Some(stored) = snap.store().get(doc_idx) {
                    let child_id = self.codec.encode(&ObjectId::item(FOLDERS_TREE, doc_idx));
                    if let Some(entry) = doc_to_entry(&child_id, objid, stored) {
                        out.push(entry);
                    }
                }
            }
        }
        out.sort_by(cmp_entries);
        Ok(out)
    }
}

fn basename(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

fn page(entries: Vec<Entry>, offset: usize, count: usize) -> Vec<Entry> {
    let iter = entries.into_iter().skip(offset);
    if count == 0 {
        iter.collect()
    } else {
        iter.take(count).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use catalog_engine::{CommandIndexer, EngineError};
    use catalog_types::{Document, IndexerSettings};

    struct FakeEngine {
        all: Vec<Document>,
        hits: Vec<Document>,
        fail_search: bool,
        last_query: Mutex<Option<String>>,
    }

    impl FakeEngine {
        fn new(all: Vec<Document>, hits: Vec<Document>) -> Self {
            Self {
                all,
                hits,
                fail_search: false,
                last_query: Mutex::new(None),
            }
        }
    }

    impl EngineClient for FakeEngine {
        fn all_documents(&self) -> Result<Vec<Document>, EngineError> {
            Ok(self.all.clone())
        }

        fn search(&self, query: &str) -> Result<Vec<Document>, EngineError> {
            *self.last_query.lock().unwrap() = Some(query.to_string());
            if self.fail_search {
                return Err(EngineError::Query("bad query".to_string()));
            }
            Ok(self.hits.clone())
        }
    }

    fn track(path: &str, album: &str, tn: &str) -> Document {
        let mut doc = Document::local(path, "audio/mpeg");
        doc.tags.album = Some(album.to_string());
        doc.tags.track_number = Some(tn.to_string());
        doc
    }

    fn music_docs() -> Vec<Document> {
        vec![
            Document::local("/music/jazz", "inode/directory"),
            track("/music/jazz/02-two.mp3", "Blue", "2"),
            track("/music/jazz/10-ten.mp3", "Blue", "10"),
            Document::local("/music/rock", "inode/directory"),
            track("/music/rock/song.mp3", "Loud", "1"),
            Document::local("/music/empty", "inode/directory"),
        ]
    }

    fn service_with(engine: FakeEngine, roots: Vec<PathBuf>) -> (CatalogService, Arc<RebuildCoordinator>) {
        let engine: Arc<FakeEngine> = Arc::new(engine);
        let indexer = CommandIndexer::new(
            &IndexerSettings {
                command: "true".to_string(),
                args: Vec::new(),
                rebuild_flag: "-z".to_string(),
            },
            None,
        );
        let coordinator = Arc::new(RebuildCoordinator::new(
            roots,
            indexer,
            Arc::clone(&engine) as Arc<dyn EngineClient>,
        ));
        assert!(coordinator.run_once(false));
        let service = CatalogService::new(
            Arc::clone(&coordinator),
            AddressCodec::new("0$catalog$"),
            engine,
        );
        (service, coordinator)
    }

    fn service() -> (CatalogService, Arc<RebuildCoordinator>) {
        service_with(
            FakeEngine::new(music_docs(), Vec::new()),
            vec![PathBuf::from("/music")],
        )
    }

    #[test]
    fn test_browse_root_collapses_single_root() {
        let (service, _) = service();
        let entries = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        // Empty directory suppressed, containers sorted by title.
        assert_eq!(titles, vec!["jazz", "rock"]);
        assert!(entries.iter().all(Entry::is_container));
    }

    #[test]
    fn test_browse_children_sorted_by_track_number() {
        let (service, _) = service();
        let root = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let jazz = &root[0];
        let tracks = service.browse(&jazz.id, BrowseFlag::Children, 0, 0).unwrap();
        let titles: Vec<&str> = tracks.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["02-two.mp3", "10-ten.mp3"]);
        assert_eq!(tracks[0].parent_id, jazz.id);
    }

    #[test]
    fn test_browse_paging() {
        let (service, _) = service();
        let root = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let jazz = &root[0];
        let page = service.browse(&jazz.id, BrowseFlag::Children, 1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "10-ten.mp3");
    }

    #[test]
    fn test_browse_metadata_on_item() {
        let (service, _) = service();
        let root = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let tracks = service
            .browse(&root[0].id, BrowseFlag::Children, 0, 0)
            .unwrap();
        let meta = service
            .browse(&tracks[0].id, BrowseFlag::Metadata, 0, 0)
            .unwrap();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].id, tracks[0].id);
        assert_eq!(meta[0].meta("album"), "Blue");
    }

    #[test]
    fn test_browse_metadata_item_parent_is_containing_folder() {
        let (service, _) = service();
        let root = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let jazz = &root[0];
        let tracks = service.browse(&jazz.id, BrowseFlag::Children, 0, 0).unwrap();
        let meta = service
            .browse(&tracks[0].id, BrowseFlag::Metadata, 0, 0)
            .unwrap();
        assert_eq!(meta[0].parent_id, jazz.id);
        // The folder's own parent is the collapsed root.
        let meta = service.browse(&jazz.id, BrowseFlag::Metadata, 0, 0).unwrap();
        assert_eq!(meta[0].parent_id, service.root_id());
    }

    #[test]
    fn test_browse_tags_tree() {
        let (service, _) = service();
        let cats = service
            .browse(&service.tags_root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let titles: Vec<&str> = cats.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Albums", "Artists", "Genres"]);
        assert!(cats.iter().all(Entry::is_container));

        let albums = service
            .browse(&cats[0].id, BrowseFlag::Children, 0, 0)
            .unwrap();
        let titles: Vec<&str> = albums.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Blue", "Loud"]);

        let tracks = service
            .browse(&albums[0].id, BrowseFlag::Children, 0, 0)
            .unwrap();
        let titles: Vec<&str> = tracks.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["02-two.mp3", "10-ten.mp3"]);
        assert!(tracks.iter().all(|e| e.id.contains("$tags$i")));
    }

    #[test]
    fn test_tags_metadata_parents() {
        let (service, _) = service();
        let cats = service
            .browse(&service.tags_root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let albums = service
            .browse(&cats[0].id, BrowseFlag::Children, 0, 0)
            .unwrap();
        let meta = service
            .browse(&albums[0].id, BrowseFlag::Metadata, 0, 0)
            .unwrap();
        assert_eq!(meta[0].title, "Blue");
        assert_eq!(meta[0].parent_id, cats[0].id);
        let meta = service.browse(&cats[0].id, BrowseFlag::Metadata, 0, 0).unwrap();
        assert_eq!(meta[0].parent_id, service.tags_root_id());
    }

    #[test]
    fn test_browse_unknown_tree_is_error() {
        let (service, _) = service();
        assert!(service
            .browse("0$catalog$albums", BrowseFlag::Children, 0, 0)
            .is_err());
        assert!(service
            .browse("0$catalog$tags$d999", BrowseFlag::Children, 0, 0)
            .is_err());
        assert!(service
            .browse("0$catalog$tags$d1$e0", BrowseFlag::Children, 0, 0)
            .is_err());
    }

    #[test]
    fn test_browse_malformed_objid_is_error() {
        let (service, _) = service();
        assert!(service
            .browse("1$other$folders", BrowseFlag::Children, 0, 0)
            .is_err());
        assert!(service
            .browse("0$catalog$folders$d9999", BrowseFlag::Children, 0, 0)
            .is_err());
    }

    #[test]
    fn test_browse_children_of_item_is_error() {
        let (service, _) = service();
        let err = service
            .browse("0$catalog$folders$i1", BrowseFlag::Children, 0, 0)
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotContainer(_)));
    }

    #[test]
    fn test_browse_while_busy_returns_placeholder() {
        let (service, coordinator) = service();
        assert!(coordinator.begin(false));
        let entries = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Initializing...");
        assert!(!entries[0].is_container());
    }

    #[test]
    fn test_search_scopes_to_browsed_container() {
        let hit = track("/music/jazz/02-two.mp3", "Blue", "2");
        let (service, _) = service_with(
            FakeEngine::new(music_docs(), vec![hit]),
            vec![PathBuf::from("/music")],
        );
        let root = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let jazz = &root[0];
        let results = service
            .search(&jazz.id, r#"dc:title contains "two""#)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].id.ends_with("$i1"));
    }

    #[test]
    fn test_search_appends_dir_clause() {
        let fake = FakeEngine::new(music_docs(), Vec::new());
        let engine: Arc<FakeEngine> = Arc::new(fake);
        let indexer = CommandIndexer::new(
            &IndexerSettings {
                command: "true".to_string(),
                args: Vec::new(),
                rebuild_flag: "-z".to_string(),
            },
            None,
        );
        let coordinator = Arc::new(RebuildCoordinator::new(
            vec![PathBuf::from("/music")],
            indexer,
            Arc::clone(&engine) as Arc<dyn EngineClient>,
        ));
        assert!(coordinator.run_once(false));
        let service = CatalogService::new(
            coordinator,
            AddressCodec::new("0$catalog$"),
            Arc::clone(&engine) as Arc<dyn EngineClient>,
        );

        let root = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let jazz = &root[0];
        service
            .search(&jazz.id, r#"upnp:artist contains "x""#)
            .unwrap();
        let query = engine.last_query.lock().unwrap().clone().unwrap();
        assert!(query.ends_with(r#" dir:"/music/jazz/""#), "query: {query}");

        // Root-scoped searches get no dir clause.
        service
            .search(&service.root_id(), r#"upnp:artist contains "x""#)
            .unwrap();
        let query = engine.last_query.lock().unwrap().clone().unwrap();
        assert!(!query.contains("dir:"), "query: {query}");

        // Neither do tag-tree scoped searches.
        service
            .search(&service.tags_root_id(), r#"upnp:artist contains "x""#)
            .unwrap();
        let query = engine.last_query.lock().unwrap().clone().unwrap();
        assert!(!query.contains("dir:"), "query: {query}");
    }

    #[test]
    fn test_untranslatable_search_is_empty() {
        let (service, _) = service();
        let results = service
            .search(&service.root_id(), r#"upnp:artist exists "true""#)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_engine_rejection_degrades_to_empty() {
        let mut fake = FakeEngine::new(music_docs(), Vec::new());
        fake.fail_search = true;
        let (service, _) = service_with(fake, vec![PathBuf::from("/music")]);
        let results = service
            .search(&service.root_id(), r#"dc:title contains "x""#)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_wildcard_misuse_propagates() {
        let (service, _) = service();
        assert!(matches!(
            service.search(&service.root_id(), r#"* and dc:title contains "x""#),
            Err(ServiceError::Search(_))
        ));
    }

    #[test]
    fn test_search_hit_outside_tree_skipped() {
        let stray = track("/elsewhere/x.mp3", "", "1");
        let (service, _) = service_with(
            FakeEngine::new(music_docs(), vec![stray]),
            vec![PathBuf::from("/music")],
        );
        let results = service
            .search(&service.root_id(), r#"dc:title contains "x""#)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_concurrent_browses_agree() {
        let (service, _) = service();
        let reference = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let entries = service
                        .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
                        .unwrap();
                    assert_eq!(entries, reference);
                });
            }
        });
    }

    #[test]
    fn test_playlist_children_keep_file_order() {
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        std::fs::create_dir_all(root.join("lists")).unwrap();
        std::fs::create_dir_all(root.join("jazz")).unwrap();
        std::fs::write(
            root.join("lists/mix.m3u"),
            "# my mix\nhttp://radio.example/stream\n../jazz/take5.flac\n",
        )
        .unwrap();

        let take5 = root.join("jazz/take5.flac");
        let playlist = root.join("lists/mix.m3u");
        let docs = vec![
            Document::local(&take5.to_string_lossy(), "audio/flac"),
            Document::local(&playlist.to_string_lossy(), "audio/x-mpegurl"),
        ];
        let (service, _) = service_with(FakeEngine::new(docs, Vec::new()), vec![root]);

        let top = service
            .browse(&service.root_id(), BrowseFlag::Children, 0, 0)
            .unwrap();
        let lists = top.iter().find(|e| e.title == "lists").unwrap();
        let inner = service
            .browse(&lists.id, BrowseFlag::Children, 0, 0)
            .unwrap();
        let mix = inner.iter().find(|e| e.title == "mix.m3u").unwrap();
        assert!(mix.is_container());

        let entries = service.browse(&mix.id, BrowseFlag::Children, 0, 0).unwrap();
        assert_eq!(entries.len(), 2);
        // File order: the synthesized URL entry first, then the local track.
        assert!(entries[0].id.ends_with("$e0"));
        assert!(entries[1].id.ends_with("$e1"));
        assert_eq!(entries[0].meta("uri"), "http://radio.example/stream");
        assert_eq!(entries[1].title, "take5.flac");
    }
}
