use log::{debug, error, info, warn};

use crate::api::DimensionApi;
use crate::dimension::{Dimension, DimensionAction, ListIntent, Route, available_actions};

/// Where a row's action menu is in its flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuState {
    Idle,
    MenuOpen,
    /// Rename dialog open with the name being edited
    RenamePending { draft: String },
    /// Reload confirmation open
    ReloadPending,
    /// Delete confirmation open
    DeletePending,
    Navigating(Route),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing changed and the menu is closed
    Closed,
    /// A dialog is waiting for input or confirmation
    Pending,
    /// The server accepted the action; the list owner applies `intent`
    Applied {
        intent: ListIntent,
        message: Option<String>,
    },
    Navigate(Route),
    /// The action is not offered for this dimension
    Unavailable(DimensionAction),
    /// A remote action of this menu is still running
    Busy,
    Failed(String),
}

/// Action menu of one row of the dimension list
///
/// Holds a snapshot of the row's dimension. The menu never touches the list
/// itself: successful remote actions return a [`ListIntent`] that the list owner
/// applies. Every remote call holds the busy lock and releases it on all paths.
#[derive(Clone, Debug)]
pub struct ActionMenu {
    dimension: Dimension,
    state: MenuState,
    busy: bool,
}

impl ActionMenu {
    pub fn new(dimension: Dimension) -> Self {
        ActionMenu {
            dimension,
            state: MenuState::Idle,
            busy: false,
        }
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn actions(&self) -> Vec<DimensionAction> {
        available_actions(&self.dimension)
    }

    pub fn open(&mut self) {
        if !self.busy {
            self.state = MenuState::MenuOpen;
        }
    }

    /// Close the menu or dismiss an open dialog.
    pub fn close(&mut self) -> ActionOutcome {
        if self.busy {
            return ActionOutcome::Busy;
        }
        self.state = MenuState::Idle;
        ActionOutcome::Closed
    }

    fn navigate(&mut self, route: Route) -> ActionOutcome {
        self.state = MenuState::Navigating(route.clone());
        ActionOutcome::Navigate(route)
    }

    /// Pick an entry from the open menu. Does nothing unless the menu is open.
    ///
    /// Navigation entries leave right away, export entries fetch the file link,
    /// and rename/reload/delete open their dialog.
    pub async fn select<A: DimensionApi>(&mut self, api: &A, action: DimensionAction) -> ActionOutcome {
        if self.busy {
            return ActionOutcome::Busy;
        }
        if self.state != MenuState::MenuOpen {
            debug!("ignoring {} for {}: menu is not open", action.label(), self.dimension.id);
            return ActionOutcome::Closed;
        }
        if !action.is_available(&self.dimension) {
            warn!("{} is not available for dimension {}", action.label(), self.dimension.id);
            return ActionOutcome::Unavailable(action);
        }

        let id = self.dimension.id.clone();
        match action {
            DimensionAction::View => self.navigate(Route::DimensionDetail(id)),
            DimensionAction::Link => self.navigate(Route::LinkDimension(id)),
            DimensionAction::Configure => self.navigate(Route::ConfigureTimeDimension(id)),
            DimensionAction::ViewHierarchy => self.navigate(Route::GlAccountHierarchy(id)),
            DimensionAction::Rename => {
                self.state = MenuState::RenamePending {
                    draft: self.dimension.name.clone(),
                };
                ActionOutcome::Pending
            }
            DimensionAction::Reload => {
                self.state = MenuState::ReloadPending;
                ActionOutcome::Pending
            }
            DimensionAction::Delete => {
                self.state = MenuState::DeletePending;
                ActionOutcome::Pending
            }
            DimensionAction::Export | DimensionAction::Download => {
                self.busy = true;
                let result = match action {
                    DimensionAction::Download => api.export_gl_account().await,
                    _ => api.export_dimension(&id).await,
                };
                self.busy = false;

                match result {
                    Ok(link) => {
                        if let Some(message) = &link.message {
                            info!("{}", message);
                        }
                        self.navigate(Route::Download(link.url))
                    }
                    Err(e) => self.fail("export", e.to_string()),
                }
            }
        }
    }

    fn fail(&mut self, action: &str, message: String) -> ActionOutcome {
        error!("{} of dimension {} failed: {}", action, self.dimension.id, message);
        self.state = MenuState::Idle;
        ActionOutcome::Failed(message)
    }

    /// Submit the rename dialog. An unchanged name closes it without a call.
    pub async fn submit_rename<A: DimensionApi>(&mut self, api: &A, name: &str) -> ActionOutcome {
        if self.busy {
            return ActionOutcome::Busy;
        }
        if !matches!(self.state, MenuState::RenamePending { .. }) {
            return ActionOutcome::Closed;
        }

        let name = name.trim();
        if name == self.dimension.name {
            self.state = MenuState::Idle;
            return ActionOutcome::Closed;
        }
        if name.is_empty() {
            self.state = MenuState::RenamePending {
                draft: String::new(),
            };
            return ActionOutcome::Failed("Name is required".to_string());
        }

        self.busy = true;
        let result = api.rename_dimension(&self.dimension.id, name).await;
        self.busy = false;

        match result {
            Ok(reply) => {
                self.dimension.name = name.to_string();
                self.state = MenuState::Idle;
                ActionOutcome::Applied {
                    intent: ListIntent::RenameById {
                        id: self.dimension.id.clone(),
                        name: name.to_string(),
                    },
                    message: reply.message,
                }
            }
            Err(e) => self.fail("rename", e.to_string()),
        }
    }

    pub async fn confirm_reload<A: DimensionApi>(&mut self, api: &A) -> ActionOutcome {
        if self.busy {
            return ActionOutcome::Busy;
        }
        if self.state != MenuState::ReloadPending {
            return ActionOutcome::Closed;
        }

        self.busy = true;
        let result = api.reload_dimension(&self.dimension.id).await;
        self.busy = false;

        match result {
            Ok(reply) => {
                self.state = MenuState::Idle;
                let refreshed = reply.data.unwrap_or_else(|| self.dimension.clone());
                self.dimension = refreshed.clone();
                ActionOutcome::Applied {
                    intent: ListIntent::ReplaceById {
                        dimension: refreshed,
                    },
                    message: reply.message,
                }
            }
            Err(e) => self.fail("reload", e.to_string()),
        }
    }

    /// Confirm deletion. The list only changes once the server accepted it.
    pub async fn confirm_delete<A: DimensionApi>(&mut self, api: &A) -> ActionOutcome {
        if self.busy {
            return ActionOutcome::Busy;
        }
        if self.state != MenuState::DeletePending {
            return ActionOutcome::Closed;
        }

        self.busy = true;
        let result = api.delete_dimension(&self.dimension.id).await;
        self.busy = false;

        match result {
            Ok(reply) => {
                self.state = MenuState::Idle;
                ActionOutcome::Applied {
                    intent: ListIntent::RemoveById {
                        id: self.dimension.id.clone(),
                    },
                    message: reply.message,
                }
            }
            Err(e) => self.fail("delete", e.to_string()),
        }
    }
}
