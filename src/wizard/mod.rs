pub mod error;

pub use error::WizardError;

use std::fmt;
use std::sync::Arc;

use crate::client::types::CreatedFolder;
use crate::client::{AdminApi, ClientError};
use crate::directory::PrincipalDirectory;
use crate::draft::{DraftUpdate, ExpansionState, FolderDraft};
use crate::grants::{GrantError, PermissionSet, PermissionUpdate, PrincipalGrant, Preset};
use crate::types::{PrincipalKind, SessionContext};

/// The three tabs of the folder creation flow. Navigation is free in both
/// directions; nothing is validated until submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    Basic,
    Permissions,
    Subfolders,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Basic, WizardStep::Permissions, WizardStep::Subfolders];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Basic => "basic",
            WizardStep::Permissions => "permissions",
            WizardStep::Subfolders => "subfolders",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controller for one run of the folder creation wizard.
///
/// Owns the draft tree outright and funnels every mutation through `&mut`
/// methods, so no other component can alias a subtree. The principal
/// directory is shared with the rest of the console and only poked for
/// picker bookkeeping. Submission is split-phase: `begin_submit` captures
/// the payload and arms the in-flight guard while `finish_submit` applies
/// the outcome. `submit` composes the two around the API call for hosts
/// that do not drive their own executor.
pub struct FolderWizard {
    api: Arc<dyn AdminApi>,
    directory: Arc<PrincipalDirectory>,
    session: SessionContext,
    parent_id: Option<String>,
    draft: FolderDraft,
    expansion: ExpansionState,
    step: WizardStep,
    dirty: bool,
    submitting: bool,
}

impl FolderWizard {
    pub fn new(api: Arc<dyn AdminApi>, directory: Arc<PrincipalDirectory>, session: SessionContext) -> Self {
        Self::for_parent(api, directory, session, None)
    }

    /// Open the wizard inside an existing folder; the created root carries
    /// `parent_id` on the wire. Fresh subfolder drafts never do.
    pub fn for_parent(
        api: Arc<dyn AdminApi>,
        directory: Arc<PrincipalDirectory>,
        session: SessionContext,
        parent_id: Option<String>,
    ) -> Self {
        let draft = FolderDraft::for_parent(parent_id.clone());
        Self {
            api,
            directory,
            session,
            parent_id,
            draft,
            expansion: ExpansionState::new(),
            step: WizardStep::default(),
            dirty: false,
            submitting: false,
        }
    }

    pub fn draft(&self) -> &FolderDraft {
        &self.draft
    }

    pub fn node(&self, path: &[usize]) -> Result<&FolderDraft, WizardError> {
        Ok(self.draft.node(path)?)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn goto(&mut self, step: WizardStep) {
        self.step = step;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Replace the working draft with one assembled elsewhere, typically a
    /// YAML or JSON file. The grant invariants the editor enforces per
    /// operation are checked over the whole tree first; a rejected draft
    /// leaves the current one in place.
    pub fn load_draft(&mut self, draft: FolderDraft) -> Result<(), WizardError> {
        Self::check_grants(&draft, &self.session.user_id)?;
        self.draft = draft;
        self.expansion.clear();
        self.dirty = true;
        Ok(())
    }

    fn check_grants(node: &FolderDraft, user_id: &str) -> Result<(), GrantError> {
        if let Some((kind, id)) = node.grants.duplicate_ids().into_iter().next() {
            return Err(GrantError::DuplicatePrincipal { kind, id });
        }
        if node.grants.contains(PrincipalKind::User, user_id) {
            return Err(GrantError::SelfGrant { id: user_id.to_string() });
        }
        for child in &node.subgroups {
            Self::check_grants(child, user_id)?;
        }
        Ok(())
    }

    /// Merge a partial update into the node at `path`.
    pub fn update_node(&mut self, path: &[usize], update: DraftUpdate) -> Result<(), WizardError> {
        self.draft.update_node(path, update)?;
        self.dirty = true;
        Ok(())
    }

    /// Append an empty subfolder draft under `parent_path` and expand the
    /// parent so the new row is visible. Returns the new node's path.
    pub fn add_child(&mut self, parent_path: &[usize]) -> Result<Vec<usize>, WizardError> {
        let path = self.draft.add_child(parent_path)?;
        self.expansion.expand(parent_path);
        self.dirty = true;
        Ok(path)
    }

    /// Remove the node at `path` together with its view state. Later siblings
    /// shift down, in the tree and in the expansion set alike.
    pub fn remove_node(&mut self, path: &[usize]) -> Result<FolderDraft, WizardError> {
        let removed = self.draft.remove_node(path)?;
        self.expansion.forget_subtree(path);
        self.dirty = true;
        Ok(removed)
    }

    pub fn toggle_expanded(&mut self, path: &[usize]) -> bool {
        self.expansion.toggle(path)
    }

    pub fn is_expanded(&self, path: &[usize]) -> bool {
        self.expansion.is_expanded(path)
    }

    /// Grant `id` the view-only preset on the node at `path`, then clear and
    /// close that kind's picker. Duplicate and self-grant rejections come back
    /// as errors with the draft untouched and the picker left alone.
    pub fn attach(&mut self, path: &[usize], kind: PrincipalKind, id: &str) -> Result<(), WizardError> {
        let node = self.draft.node_mut(path)?;
        node.grants.attach(kind, id, &self.session.user_id)?;
        self.directory.select(kind);
        self.dirty = true;
        Ok(())
    }

    /// Merge partial flag changes into one grant on the node at `path`.
    pub fn update_grant(
        &mut self,
        path: &[usize],
        kind: PrincipalKind,
        index: usize,
        update: PermissionUpdate,
    ) -> Result<(), WizardError> {
        let node = self.draft.node_mut(path)?;
        node.grants.update(kind, index, update).map_err(Self::defect)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_grant(
        &mut self,
        path: &[usize],
        kind: PrincipalKind,
        index: usize,
    ) -> Result<PrincipalGrant, WizardError> {
        let node = self.draft.node_mut(path)?;
        let removed = node.grants.remove(kind, index).map_err(Self::defect)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn apply_preset(
        &mut self,
        path: &[usize],
        kind: PrincipalKind,
        index: usize,
        preset: Preset,
    ) -> Result<(), WizardError> {
        let node = self.draft.node_mut(path)?;
        node.grants.apply_preset(kind, index, preset).map_err(Self::defect)?;
        self.dirty = true;
        Ok(())
    }

    /// Write a full flag set assembled in a permission dialog.
    pub fn set_grant_permissions(
        &mut self,
        path: &[usize],
        kind: PrincipalKind,
        index: usize,
        permissions: PermissionSet,
    ) -> Result<(), WizardError> {
        let node = self.draft.node_mut(path)?;
        node.grants.set_permissions(kind, index, permissions).map_err(Self::defect)?;
        self.dirty = true;
        Ok(())
    }

    // Grant indices come from the rendered sequences, so an out-of-bounds
    // index is a caller bug rather than user input.
    fn defect(err: GrantError) -> GrantError {
        if let GrantError::IndexOutOfBounds { kind, index, len } = &err {
            tracing::error!(kind = %kind, index, len, "grant index out of bounds");
        }
        err
    }

    /// Validate and capture the submission payload, arming the in-flight
    /// guard. The caller sends the returned draft and reports back through
    /// [`FolderWizard::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<FolderDraft, WizardError> {
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        if self.draft.name.trim().is_empty() {
            return Err(WizardError::EmptyFolderName);
        }
        self.submitting = true;
        Ok(self.draft.clone())
    }

    /// Apply a submission outcome. Success resets the whole wizard; failure
    /// keeps the draft as typed so the user can retry.
    pub fn finish_submit(
        &mut self,
        result: Result<CreatedFolder, ClientError>,
    ) -> Result<CreatedFolder, WizardError> {
        self.submitting = false;
        match result {
            Ok(created) => {
                tracing::debug!(folder_id = %created.id, "folder tree created");
                self.reset();
                Ok(created)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Send the whole draft as one request.
    pub async fn submit(&mut self) -> Result<CreatedFolder, WizardError> {
        let draft = self.begin_submit()?;
        let result = self.api.create_folder(&draft).await;
        self.finish_submit(result)
    }

    /// Discard the draft and start over. Refused while a submission is in
    /// flight; its outcome decides what happens to the draft.
    pub fn cancel(&mut self) -> Result<(), WizardError> {
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.draft = FolderDraft::for_parent(self.parent_id.clone());
        self.expansion.clear();
        self.step = WizardStep::default();
        self.dirty = false;
        self.directory.reset_pickers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DirectoryConfig;
    use crate::directory::PickerState;
    use crate::grants::{classify, Classification};
    use crate::testing::{sample_directory, StubApi};

    fn wizard_with(api: StubApi) -> (Arc<StubApi>, Arc<PrincipalDirectory>, FolderWizard) {
        let api = Arc::new(api);
        let directory = Arc::new(PrincipalDirectory::with_config(
            Arc::clone(&api) as Arc<dyn AdminApi>,
            DirectoryConfig::default(),
        ));
        let wizard = FolderWizard::new(
            Arc::clone(&api) as Arc<dyn AdminApi>,
            Arc::clone(&directory),
            SessionContext::new("me"),
        );
        (api, directory, wizard)
    }

    fn failure() -> ClientError {
        ClientError::UnexpectedStatus {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn blank_root_name_is_rejected_before_any_request() {
        let (api, _, mut wizard) = wizard_with(StubApi::new());
        wizard.update_node(&[], DraftUpdate::rename("   ")).unwrap();

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, WizardError::EmptyFolderName));
        assert!(api.calls().created.is_empty());
        assert_eq!(wizard.draft().name, "   ");
        assert!(wizard.is_dirty());
        assert!(!wizard.is_submitting());
    }

    #[tokio::test]
    async fn failed_submission_keeps_the_draft_for_retry() {
        let mut api = StubApi::new();
        api.fail_create = true;
        let (api, _, mut wizard) = wizard_with(api);

        wizard.update_node(&[], DraftUpdate::rename("Quarterly")).unwrap();
        wizard.add_child(&[]).unwrap();

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, WizardError::Client(_)));
        assert_eq!(api.calls().created.len(), 1);
        assert_eq!(wizard.draft().name, "Quarterly");
        assert_eq!(wizard.draft().node_count(), 2);
        assert!(wizard.is_dirty());
        assert!(!wizard.is_submitting(), "a failed submission must release the guard");

        // The retry path is open again
        assert!(wizard.begin_submit().is_ok());
        assert!(wizard.finish_submit(Err(failure())).is_err());
    }

    #[tokio::test]
    async fn successful_submission_resets_the_wizard() {
        let (users, groups, roles) = sample_directory();
        let (api, directory, mut wizard) = wizard_with(StubApi::with_directory(users, groups, roles));

        wizard.update_node(&[], DraftUpdate::rename("Quarterly")).unwrap();
        wizard.attach(&[], PrincipalKind::Group, "g1").unwrap();
        let child = wizard.add_child(&[]).unwrap();
        wizard.update_node(&child, DraftUpdate::rename("Reports")).unwrap();
        wizard.goto(WizardStep::Subfolders);

        let created = wizard.submit().await.unwrap();
        assert_eq!(created.id, "folder-1");

        assert_eq!(wizard.draft().name, "");
        assert_eq!(wizard.draft().node_count(), 1);
        assert!(wizard.draft().grants.is_empty());
        assert_eq!(wizard.step(), WizardStep::Basic);
        assert!(!wizard.is_dirty());
        assert!(!wizard.is_expanded(&[]));
        assert_eq!(directory.picker_state(PrincipalKind::Group), PickerState::Idle);

        let sent = &api.calls().created[0];
        assert_eq!(sent.name, "Quarterly");
        assert_eq!(sent.subgroups[0].name, "Reports");
        assert_eq!(sent.grants.sequence(PrincipalKind::Group).len(), 1);
    }

    #[tokio::test]
    async fn cancel_is_refused_while_a_submission_is_in_flight() {
        let (_, _, mut wizard) = wizard_with(StubApi::new());
        wizard.update_node(&[], DraftUpdate::rename("Quarterly")).unwrap();

        let payload = wizard.begin_submit().unwrap();
        assert!(matches!(wizard.cancel(), Err(WizardError::SubmissionInFlight)));
        assert!(matches!(wizard.begin_submit(), Err(WizardError::SubmissionInFlight)));
        assert_eq!(wizard.draft().name, "Quarterly");

        let created = CreatedFolder { id: "folder-9".to_string(), name: payload.name };
        wizard.finish_submit(Ok(created)).unwrap();
        assert_eq!(wizard.draft().name, "");
        assert!(wizard.cancel().is_ok());
    }

    #[tokio::test]
    async fn cancel_discards_the_draft_without_a_request() {
        let (api, _, mut wizard) = wizard_with(StubApi::new());
        wizard.update_node(&[], DraftUpdate::rename("Scratch")).unwrap();
        wizard.add_child(&[]).unwrap();

        wizard.cancel().unwrap();
        assert_eq!(wizard.draft().name, "");
        assert_eq!(wizard.draft().node_count(), 1);
        assert!(!wizard.is_dirty());
        assert!(api.calls().created.is_empty());
    }

    #[tokio::test]
    async fn attach_closes_and_clears_that_kinds_picker() {
        let (users, groups, roles) = sample_directory();
        let (_, directory, mut wizard) = wizard_with(StubApi::with_directory(users, groups, roles));

        directory.input(PrincipalKind::User, "gr");
        assert_eq!(directory.picker_state(PrincipalKind::User), PickerState::Focused);

        wizard.attach(&[], PrincipalKind::User, "u2").unwrap();
        assert_eq!(directory.picker_state(PrincipalKind::User), PickerState::Closed);
        assert_eq!(directory.picker_query(PrincipalKind::User), "");

        let grants = wizard.draft().grants.sequence(PrincipalKind::User);
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].id, "u2");
        assert_eq!(classify(&grants[0].permission), Classification::Preset(Preset::ViewOnly));
    }

    #[tokio::test]
    async fn rejected_attach_changes_nothing() {
        let (_, directory, mut wizard) = wizard_with(StubApi::new());
        directory.input(PrincipalKind::User, "me");

        let err = wizard.attach(&[], PrincipalKind::User, "me").unwrap_err();
        assert!(matches!(err, WizardError::Grant(GrantError::SelfGrant { .. })));
        assert!(!wizard.is_dirty());
        assert!(wizard.draft().grants.is_empty());
        assert_eq!(directory.picker_query(PrincipalKind::User), "me", "the picker keeps its query");
    }

    #[tokio::test]
    async fn grant_edits_address_nodes_by_path() {
        let (_, _, mut wizard) = wizard_with(StubApi::new());
        let child = wizard.add_child(&[]).unwrap();

        wizard.attach(&child, PrincipalKind::Role, "r1").unwrap();
        wizard.apply_preset(&child, PrincipalKind::Role, 0, Preset::Admin).unwrap();

        let node = wizard.node(&child).unwrap();
        let grant = &node.grants.sequence(PrincipalKind::Role)[0];
        assert_eq!(classify(&grant.permission), Classification::Preset(Preset::Admin));
        assert!(wizard.draft().grants.is_empty(), "the root node is untouched");

        wizard
            .update_grant(&child, PrincipalKind::Role, 0, PermissionUpdate { can_share: Some(false), ..Default::default() })
            .unwrap();
        let node = wizard.node(&child).unwrap();
        let grant = &node.grants.sequence(PrincipalKind::Role)[0];
        assert_eq!(classify(&grant.permission), Classification::Custom);
    }

    #[tokio::test]
    async fn a_full_flag_set_writes_through_to_one_grant() {
        let (_, _, mut wizard) = wizard_with(StubApi::new());
        wizard.attach(&[], PrincipalKind::Group, "g1").unwrap();

        let mut flags = Preset::Editor.permissions();
        flags.can_manage_permissions = true;
        flags.inherits = false;
        wizard.set_grant_permissions(&[], PrincipalKind::Group, 0, flags).unwrap();

        let grant = &wizard.draft().grants.sequence(PrincipalKind::Group)[0];
        assert_eq!(grant.permission, flags, "the dialog's set lands verbatim");
        assert_eq!(classify(&grant.permission), Classification::Custom);
        assert!(wizard.is_dirty());
    }

    #[tokio::test]
    async fn out_of_bounds_grant_index_is_an_error() {
        let (_, _, mut wizard) = wizard_with(StubApi::new());
        let err = wizard
            .update_grant(&[], PrincipalKind::User, 5, PermissionUpdate::default())
            .unwrap_err();
        assert!(matches!(
            err,
            WizardError::Grant(GrantError::IndexOutOfBounds { index: 5, len: 0, .. })
        ));
        assert!(!wizard.is_dirty());
    }

    #[tokio::test]
    async fn loaded_drafts_pass_through_the_grant_checks() {
        let (_, _, mut wizard) = wizard_with(StubApi::new());

        let mut good = FolderDraft { name: "Imported".to_string(), ..Default::default() };
        good.grants.attach(PrincipalKind::Role, "r1", "me").unwrap();
        wizard.load_draft(good).unwrap();
        assert_eq!(wizard.draft().name, "Imported");
        assert!(wizard.is_dirty());

        let mut bad = FolderDraft { name: "Broken".to_string(), ..Default::default() };
        bad.grants.users.push(PrincipalGrant::with_view_only("u1"));
        bad.grants.users.push(PrincipalGrant::with_view_only("u1"));
        let err = wizard.load_draft(bad).unwrap_err();
        assert!(matches!(err, WizardError::Grant(GrantError::DuplicatePrincipal { .. })));
        assert_eq!(wizard.draft().name, "Imported", "a rejected load keeps the current draft");

        let mut selfish = FolderDraft { name: "Mine".to_string(), ..Default::default() };
        selfish.grants.users.push(PrincipalGrant::with_view_only("me"));
        assert!(matches!(
            wizard.load_draft(selfish).unwrap_err(),
            WizardError::Grant(GrantError::SelfGrant { .. })
        ));
    }

    #[tokio::test]
    async fn steps_navigate_freely_without_dirtying() {
        let (_, _, mut wizard) = wizard_with(StubApi::new());
        assert_eq!(wizard.step(), WizardStep::Basic);

        wizard.goto(WizardStep::Subfolders);
        wizard.goto(WizardStep::Permissions);
        wizard.goto(WizardStep::Basic);
        assert_eq!(wizard.step(), WizardStep::Basic);
        assert!(!wizard.is_dirty());
    }

    #[tokio::test]
    async fn removing_a_node_drops_its_view_state() {
        let (_, _, mut wizard) = wizard_with(StubApi::new());
        wizard.add_child(&[]).unwrap();
        wizard.add_child(&[]).unwrap();
        assert!(wizard.is_expanded(&[]), "adding a child expands the parent");

        wizard.toggle_expanded(&[0]);
        assert!(wizard.is_expanded(&[0]));

        wizard.remove_node(&[0]).unwrap();
        assert!(!wizard.is_expanded(&[0]), "the survivor at [0] starts collapsed");
        assert_eq!(wizard.draft().node_count(), 2);
    }
}
