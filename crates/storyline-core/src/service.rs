//! Synchronizing script service.
//!
//! Every operation follows the same decision procedure: without a valid
//! session (or when configured offline) it works on the local store only.
//! Otherwise it calls the gateway, mirrors successful results locally and
//! degrades to the local path when the backend answers 401. Other gateway
//! failures propagate unchanged.

use crate::assistant;
use crate::clock::Clock;
use crate::error::SyncError;
use crate::session::SessionValidator;
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use storyline_client::{GatewayError, ScriptGateway};
use storyline_protocol::{Script, ScriptCreate, ScriptId, ScriptUpdate, Suggestion};
use storyline_store::LocalRecordStore;

/// Result of attempting the remote leg of an operation.
enum Remote<T> {
    Done(T),
    Fallback,
}

/// Facade over the remote gateway and the local record store.
#[derive(Clone)]
pub struct ScriptService {
    gateway: Arc<dyn ScriptGateway>,
    records: LocalRecordStore,
    session: SessionValidator,
    clock: Arc<dyn Clock>,
    offline: bool,
}

impl ScriptService {
    pub fn new(
        gateway: Arc<dyn ScriptGateway>,
        records: LocalRecordStore,
        session: SessionValidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            records,
            session,
            clock,
            offline: false,
        }
    }

    /// Never touch the network, even with a valid session.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn records(&self) -> &LocalRecordStore {
        &self.records
    }

    pub fn is_session_valid(&self) -> bool {
        self.session.is_session_valid()
    }

    pub async fn list_scripts(&self) -> Result<Vec<Script>, SyncError> {
        let gateway = &self.gateway;
        match self
            .remote("list", |token| async move { gateway.list(&token).await })
            .await?
        {
            Remote::Done(scripts) => {
                self.drop_orphaned_content(&scripts)?;
                self.records.save_records(&scripts)?;
                Ok(scripts)
            }
            Remote::Fallback => Ok(self.records.list_records()),
        }
    }

    /// Remote results are returned as-is; the local path attaches stored content.
    pub async fn get_script(&self, id: ScriptId) -> Result<Script, SyncError> {
        let gateway = &self.gateway;
        match self
            .remote("get", |token| async move { gateway.get(&token, id).await })
            .await?
        {
            Remote::Done(script) => Ok(script),
            Remote::Fallback => self.local_get(id),
        }
    }

    pub async fn create_script(&self, data: &ScriptCreate) -> Result<Script, SyncError> {
        let gateway = &self.gateway;
        match self
            .remote("create", |token| async move {
                gateway.create(&token, data).await
            })
            .await?
        {
            Remote::Done(script) => {
                self.mirror_created(&script)?;
                Ok(script)
            }
            Remote::Fallback => self.local_create(data),
        }
    }

    pub async fn update_script(
        &self,
        id: ScriptId,
        patch: &ScriptUpdate,
    ) -> Result<Script, SyncError> {
        let gateway = &self.gateway;
        match self
            .remote("update", |token| async move {
                gateway.update(&token, id, patch).await
            })
            .await?
        {
            Remote::Done(script) => {
                self.mirror_updated(&script)?;
                Ok(script)
            }
            Remote::Fallback => self.local_update(id, patch),
        }
    }

    /// Deleting an id the local store does not know is a no-op.
    pub async fn delete_script(&self, id: ScriptId) -> Result<(), SyncError> {
        let gateway = &self.gateway;
        // Both outcomes converge on the same local removal.
        let _ = self
            .remote("delete", |token| async move {
                gateway.remove(&token, id).await
            })
            .await?;
        self.local_delete(id)
    }

    /// Autosave: the local write always happens first.
    pub async fn update_script_content(
        &self,
        id: ScriptId,
        content: &str,
    ) -> Result<(), SyncError> {
        self.records.save_content(id, content)?;
        let gateway = &self.gateway;
        let _ = self
            .remote("patch_content", |token| async move {
                gateway.patch_content(&token, id, content).await
            })
            .await?;
        Ok(())
    }

    pub async fn optimize_prompt(&self, prompt: &str) -> Result<Vec<String>, SyncError> {
        let gateway = &self.gateway;
        match self
            .remote("optimize_prompt", |token| async move {
                gateway.optimize_prompt(&token, prompt).await
            })
            .await?
        {
            Remote::Done(suggestions) => Ok(suggestions),
            Remote::Fallback => Ok(assistant::prompt_variants(prompt)),
        }
    }

    pub async fn optimize_content(
        &self,
        content: &str,
        script_id: Option<ScriptId>,
    ) -> Result<Vec<Suggestion>, SyncError> {
        let gateway = &self.gateway;
        match self
            .remote("optimize_content", |token| async move {
                gateway.optimize_content(&token, content, script_id).await
            })
            .await?
        {
            Remote::Done(suggestions) => Ok(suggestions),
            Remote::Fallback => Ok(assistant::content_suggestions(content)),
        }
    }

    /// Run `call` with the active token, or report that the local path applies.
    async fn remote<T, F, Fut>(&self, op: &'static str, call: F) -> Result<Remote<T>, SyncError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        if self.offline {
            debug!("{op}: offline mode, using local store");
            return Ok(Remote::Fallback);
        }
        let Some(token) = self.session.active_token() else {
            debug!("{op}: no valid session, using local store");
            return Ok(Remote::Fallback);
        };
        match call(token).await {
            Ok(value) => Ok(Remote::Done(value)),
            Err(err) if err.is_unauthorized() => {
                warn!("{op}: backend rejected the session (401), falling back to local store");
                Ok(Remote::Fallback)
            }
            Err(err) => {
                warn!("{op}: gateway call failed: {err}");
                Err(err.into())
            }
        }
    }

    /// Content entries of cached records the backend no longer lists.
    fn drop_orphaned_content(&self, listed: &[Script]) -> Result<(), SyncError> {
        for record in self.records.list_records() {
            if listed.iter().all(|script| script.id != record.id) {
                debug!("dropping content of unlisted script (script_id={})", record.id);
                self.records.delete_content(record.id)?;
            }
        }
        Ok(())
    }

    fn mirror_created(&self, script: &Script) -> Result<(), SyncError> {
        let mut records = self.records.list_records();
        records.retain(|record| record.id != script.id);
        records.insert(0, script.clone());
        self.records.save_records(&records)?;
        if let Some(content) = &script.content {
            self.records.save_content(script.id, content)?;
        }
        debug!("mirrored remote create (script_id={})", script.id);
        Ok(())
    }

    fn mirror_updated(&self, script: &Script) -> Result<(), SyncError> {
        let mut records = self.records.list_records();
        match records.iter_mut().find(|record| record.id == script.id) {
            Some(record) => *record = script.clone(),
            None => records.insert(0, script.clone()),
        }
        self.records.save_records(&records)?;
        if let Some(content) = &script.content {
            self.records.save_content(script.id, content)?;
        }
        debug!("mirrored remote update (script_id={})", script.id);
        Ok(())
    }

    fn local_get(&self, id: ScriptId) -> Result<Script, SyncError> {
        let mut script = self
            .records
            .list_records()
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(SyncError::NotFound(id))?;
        script.content = Some(self.records.get_content(id));
        Ok(script)
    }

    fn local_create(&self, data: &ScriptCreate) -> Result<Script, SyncError> {
        let mut records = self.records.list_records();
        let mut id = self.clock.now_ms();
        while records.iter().any(|record| record.id == id) {
            id += 1;
        }
        let script = Script::local(id, data, self.clock.now());
        records.insert(0, script.clone());
        self.records.save_records(&records)?;
        self.records
            .save_content(id, data.content.as_deref().unwrap_or_default())?;
        info!("created local script (script_id={id})");
        Ok(script)
    }

    fn local_update(&self, id: ScriptId, patch: &ScriptUpdate) -> Result<Script, SyncError> {
        let mut records = self.records.list_records();
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(SyncError::NotFound(id))?;
        patch.apply(record);
        record.updated_at = Some(self.clock.now());
        let updated = record.clone();
        self.records.save_records(&records)?;
        if let Some(content) = &patch.content {
            self.records.save_content(id, content)?;
        }
        info!("updated local script (script_id={id})");
        Ok(updated)
    }

    fn local_delete(&self, id: ScriptId) -> Result<(), SyncError> {
        let mut records = self.records.list_records();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() != before {
            self.records.save_records(&records)?;
            info!("deleted local script (script_id={id})");
        }
        self.records.delete_content(id)?;
        Ok(())
    }
}
