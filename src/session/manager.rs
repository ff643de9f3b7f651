//! Document session manager

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::outline::{validate_commit, BookmarkNode};
use crate::storage::DiskStore;

use super::types::{DocumentSession, SessionError};

// ============================================================================
// Session Manager
// ============================================================================

/// Manages document editing sessions
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    /// Active sessions indexed by session ID
    sessions: RwLock<HashMap<Uuid, DocumentSession>>,

    /// Lifetime applied to every new session
    ttl: chrono::Duration,
}

impl SessionManager {
    /// Create a manager whose sessions live for `ttl_minutes`
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            inner: Arc::new(SessionManagerInner {
                sessions: RwLock::new(HashMap::new()),
                ttl: chrono::Duration::minutes(ttl_minutes),
            }),
        }
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Create a new session for an uploaded document
    pub async fn create_session(
        &self,
        file_name: String,
        title: String,
        page_count: u32,
    ) -> DocumentSession {
        let session = DocumentSession::new(file_name, title, page_count, self.inner.ttl);
        let snapshot = session.clone();

        {
            let mut sessions = self.inner.sessions.write().await;
            sessions.insert(session.id, session);
        }

        tracing::info!(
            session_id = %snapshot.id,
            file_name = %snapshot.file_name,
            page_count = snapshot.page_count,
            "Created document session"
        );

        snapshot
    }

    /// Get a session snapshot by ID
    ///
    /// The returned copy is independent of the stored session; edits
    /// committed after this call do not show up in it.
    pub async fn get_session(&self, id: Uuid) -> Result<DocumentSession, SessionError> {
        let sessions = self.inner.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::NotFound(id))?;

        if session.is_expired() {
            return Err(SessionError::Expired(id));
        }

        Ok(session.clone())
    }

    /// Remove a session and return it
    pub async fn remove_session(&self, id: Uuid) -> Result<DocumentSession, SessionError> {
        let session = {
            let mut sessions = self.inner.sessions.write().await;
            sessions.remove(&id).ok_or(SessionError::NotFound(id))?
        };

        tracing::info!(session_id = %id, file_name = %session.file_name, "Removed document session");
        Ok(session)
    }

    /// Get the number of live sessions
    pub async fn session_count(&self) -> usize {
        let sessions = self.inner.sessions.read().await;
        sessions.len()
    }

    // ========================================================================
    // Bookmark Operations
    // ========================================================================

    /// Validate and insert a root-level bookmark
    pub async fn insert_root(
        &self,
        id: Uuid,
        title: &str,
        page: i64,
    ) -> Result<BookmarkNode, SessionError> {
        let node = self
            .with_session_mut(id, |session| {
                let (title, page) = validate_commit(title, page, Some(session.page_count))?;
                Ok(session.forest.insert_root(title, page))
            })
            .await?;

        tracing::debug!(session_id = %id, node_id = %node.id, "Inserted root bookmark");
        Ok(node)
    }

    /// Validate and insert a bookmark as the last child of `parent_id`
    pub async fn insert_child(
        &self,
        id: Uuid,
        parent_id: Uuid,
        title: &str,
        page: i64,
    ) -> Result<BookmarkNode, SessionError> {
        let node = self
            .with_session_mut(id, |session| {
                let (title, page) = validate_commit(title, page, Some(session.page_count))?;
                Ok(session.forest.insert_child(parent_id, title, page)?)
            })
            .await?;

        tracing::debug!(
            session_id = %id,
            node_id = %node.id,
            parent_id = %parent_id,
            "Inserted child bookmark"
        );
        Ok(node)
    }

    /// Validate and rewrite the title and page of an existing bookmark
    pub async fn edit_bookmark(
        &self,
        id: Uuid,
        node_id: Uuid,
        title: &str,
        page: i64,
    ) -> Result<BookmarkNode, SessionError> {
        let node = self
            .with_session_mut(id, |session| {
                let (title, page) = validate_commit(title, page, Some(session.page_count))?;
                Ok(session.forest.edit(node_id, title, page)?)
            })
            .await?;

        tracing::debug!(session_id = %id, node_id = %node_id, "Edited bookmark");
        Ok(node)
    }

    /// Remove a bookmark and its descendants, returning how many nodes went
    pub async fn remove_bookmark(&self, id: Uuid, node_id: Uuid) -> Result<usize, SessionError> {
        let removed = self
            .with_session_mut(id, |session| Ok(session.forest.remove(node_id)?))
            .await?;

        let count = removed.subtree_size();
        tracing::debug!(session_id = %id, node_id = %node_id, nodes = count, "Removed bookmark subtree");
        Ok(count)
    }

    /// Seed an empty forest with bookmarks imported from the document
    pub async fn seed_bookmarks(
        &self,
        id: Uuid,
        nodes: Vec<BookmarkNode>,
    ) -> Result<usize, SessionError> {
        let count = self
            .with_session_mut(id, |session| Ok(session.forest.seed(nodes)?))
            .await?;

        tracing::info!(session_id = %id, nodes = count, "Imported document outline");
        Ok(count)
    }

    // Runs `op` on the live session under a single write lock, which makes
    // each bookmark operation atomic with respect to every other writer.
    async fn with_session_mut<T>(
        &self,
        id: Uuid,
        op: impl FnOnce(&mut DocumentSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;

        if session.is_expired() {
            return Err(SessionError::Expired(id));
        }

        op(session)
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Remove all expired sessions and return their IDs
    pub async fn cleanup_expired(&self) -> Vec<Uuid> {
        let mut expired = Vec::new();

        {
            let mut sessions = self.inner.sessions.write().await;
            sessions.retain(|id, session| {
                if session.is_expired() {
                    expired.push(*id);
                    false
                } else {
                    true
                }
            });
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Cleaned up expired document sessions");
        }

        expired
    }

    /// Start the background cleanup task
    ///
    /// Sweeps expired sessions on an interval and deletes their stored files.
    pub fn start_cleanup_task(self, store: DiskStore, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);

            loop {
                interval.tick().await;

                for id in self.cleanup_expired().await {
                    if let Err(error) = store.remove(id).await {
                        tracing::warn!(session_id = %id, %error, "Failed to remove stored document");
                    }
                }
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
