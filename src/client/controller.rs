//! The state machine behind the expense form and list.
//!
//! The controller never performs I/O itself. Each user action returns a
//! [Request] to send to the API, and each reply is passed back to
//! [ExpenseController::handle_reply], which returns the [Effect]s to carry out.
//!
//! Replies may arrive in any order. A reply to a list request is ignored if a
//! newer list request has been made since, and a reply to an edit request is
//! ignored if the user has since started editing another expense, cancelled or
//! submitted the form. A successful create or update only clears the form if
//! the user has not moved on to another expense since submitting.

use std::collections::HashMap;

use crate::{
    client::api::{ApiCall, ApiFailure, ApiReply},
    expense::{Expense, ExpenseForm, ExpenseId, total_amount},
};

/// Identifies a request so that its reply can be matched up with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

/// A call to make to the API on behalf of the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Pass this ID to [ExpenseController::handle_reply] with the reply.
    pub id: RequestId,
    /// What to ask the API for.
    pub call: ApiCall,
}

/// Whether a notification reports a success or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// An action completed.
    Success,
    /// An action failed.
    Error,
}

/// A message to show the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Whether the message reports a success or a failure.
    pub kind: NotificationKind,
    /// The text to show.
    pub message: String,
}

impl Notification {
    /// Create a success notification.
    pub fn success(message: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.to_owned(),
        }
    }

    /// Create an error notification.
    pub fn error(message: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.to_owned(),
        }
    }
}

/// Something the owner of the controller must do after a reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Make another request.
    Send(Request),
    /// Show a message to the user.
    Notify(Notification),
    /// Redraw the list and form from the controller's state.
    Render,
}

/// What a submission of the form will do.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    /// Submitting the form creates a new expense.
    Adding,
    /// Submitting the form updates the expense `id`.
    Editing {
        /// The expense loaded into the form.
        id: ExpenseId,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Load,
    Edit,
    Create { generation: u64 },
    Update { generation: u64 },
    Delete(ExpenseId),
}

/// The state of the expense list and form.
#[derive(Debug, Clone)]
pub struct ExpenseController {
    mode: FormMode,
    form: ExpenseForm,
    expenses: Vec<Expense>,
    next_request_id: u64,
    pending: HashMap<RequestId, Action>,
    latest_load: Option<RequestId>,
    latest_edit: Option<RequestId>,
    /// Incremented whenever the user starts editing or clears the form.
    form_generation: u64,
}

impl Default for ExpenseController {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseController {
    /// Create a controller in [FormMode::Adding] with an empty list.
    pub fn new() -> Self {
        Self {
            mode: FormMode::Adding,
            form: ExpenseForm::default(),
            expenses: Vec::new(),
            next_request_id: 0,
            pending: HashMap::new(),
            latest_load: None,
            latest_edit: None,
            form_generation: 0,
        }
    }

    /// What submitting the form will do.
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// The values currently in the form.
    pub fn form(&self) -> &ExpenseForm {
        &self.form
    }

    /// The expenses from the most recent list reply.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// The sum of the amounts of the listed expenses.
    pub fn total(&self) -> f64 {
        total_amount(&self.expenses)
    }

    /// The total formatted with two decimal places, e.g. "120.50".
    pub fn formatted_total(&self) -> String {
        format!("{:.2}", self.total())
    }

    /// The label for the form's submit button.
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Adding => "Add Expense",
            FormMode::Editing { .. } => "Update Expense",
        }
    }

    /// Whether the cancel button should be shown.
    pub fn can_cancel(&self) -> bool {
        matches!(self.mode, FormMode::Editing { .. })
    }

    /// Fetch the full list of expenses.
    pub fn load(&mut self) -> Request {
        let request = self.request(Action::Load, ApiCall::ListExpenses);
        self.latest_load = Some(request.id);
        request
    }

    /// Fetch the expense `id` so that it can be edited.
    pub fn edit(&mut self, id: &str) -> Request {
        let request = self.request(Action::Edit, ApiCall::GetExpense(id.to_owned()));
        self.latest_edit = Some(request.id);
        self.form_generation += 1;
        request
    }

    /// Stop editing and clear the form.
    ///
    /// A reply to an edit request that is still in flight will be ignored.
    pub fn cancel(&mut self) {
        self.latest_edit = None;
        self.reset_form();
    }

    /// Submit `form`, creating a new expense or updating the one being edited.
    ///
    /// A reply to an edit request that is still in flight will be ignored.
    pub fn submit(&mut self, form: ExpenseForm) -> Request {
        self.form = form.clone();
        self.latest_edit = None;
        let generation = self.form_generation;

        match &self.mode {
            FormMode::Adding => {
                self.request(Action::Create { generation }, ApiCall::CreateExpense(form))
            }
            FormMode::Editing { id } => {
                let call = ApiCall::UpdateExpense(id.clone(), form);
                self.request(Action::Update { generation }, call)
            }
        }
    }

    /// Delete the expense `id`.
    ///
    /// The caller is responsible for asking the user to confirm first.
    /// If `id` is being edited, the form is cleared once the deletion succeeds.
    pub fn delete(&mut self, id: &str) -> Request {
        self.request(
            Action::Delete(id.to_owned()),
            ApiCall::DeleteExpense(id.to_owned()),
        )
    }

    /// Update the state with the reply to the request `id`.
    ///
    /// Replies to unknown or superseded requests produce no effects.
    pub fn handle_reply(
        &mut self,
        id: RequestId,
        reply: Result<ApiReply, ApiFailure>,
    ) -> Vec<Effect> {
        let Some(action) = self.pending.remove(&id) else {
            tracing::debug!("Ignoring reply to unknown request {id:?}");
            return vec![];
        };

        match action {
            Action::Load if self.latest_load != Some(id) => {
                tracing::debug!("Ignoring reply to superseded list request {id:?}");
                vec![]
            }
            Action::Edit if self.latest_edit != Some(id) => {
                tracing::debug!("Ignoring reply to superseded edit request {id:?}");
                vec![]
            }
            Action::Load => self.handle_load(reply),
            Action::Edit => self.handle_edit(reply),
            Action::Create { generation } => self.handle_saved(
                reply,
                generation,
                "Expense added successfully!",
                "Failed to add expense",
            ),
            Action::Update { generation } => self.handle_saved(
                reply,
                generation,
                "Expense updated successfully!",
                "Failed to update expense",
            ),
            Action::Delete(id) => self.handle_delete(&id, reply),
        }
    }

    fn request(&mut self, action: Action, call: ApiCall) -> Request {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        self.pending.insert(id, action);

        Request { id, call }
    }

    fn reset_form(&mut self) {
        self.form_generation += 1;
        self.mode = FormMode::Adding;
        self.form = ExpenseForm::default();
    }

    fn handle_load(&mut self, reply: Result<ApiReply, ApiFailure>) -> Vec<Effect> {
        self.latest_load = None;

        match reply {
            Ok(ApiReply::Expenses(expenses)) => {
                self.expenses = expenses;
                vec![Effect::Render]
            }
            other => failure_effects(other, "Failed to load expenses"),
        }
    }

    fn handle_edit(&mut self, reply: Result<ApiReply, ApiFailure>) -> Vec<Effect> {
        self.latest_edit = None;

        match reply {
            Ok(ApiReply::Expense(expense)) => {
                self.form = ExpenseForm::from(&expense);
                self.mode = FormMode::Editing { id: expense.id };
                vec![Effect::Render]
            }
            other => failure_effects(other, "Failed to load expense for editing"),
        }
    }

    fn handle_saved(
        &mut self,
        reply: Result<ApiReply, ApiFailure>,
        generation: u64,
        success_message: &str,
        fallback_message: &str,
    ) -> Vec<Effect> {
        match reply {
            Ok(ApiReply::Expense(_)) => {
                let mut effects = vec![Effect::Notify(Notification::success(success_message))];

                if generation == self.form_generation {
                    self.reset_form();
                    effects.push(Effect::Render);
                } else {
                    tracing::debug!("Keeping the form, it changed after the submission was sent");
                }

                effects.push(Effect::Send(self.load()));
                effects
            }
            other => failure_effects(other, fallback_message),
        }
    }

    fn handle_delete(&mut self, id: &str, reply: Result<ApiReply, ApiFailure>) -> Vec<Effect> {
        match reply {
            Ok(ApiReply::Deleted) => {
                let mut effects = vec![Effect::Notify(Notification::success(
                    "Expense deleted successfully!",
                ))];

                if matches!(&self.mode, FormMode::Editing { id: editing } if editing == id) {
                    self.latest_edit = None;
                    self.reset_form();
                    effects.push(Effect::Render);
                }

                effects.push(Effect::Send(self.load()));
                effects
            }
            other => failure_effects(other, "Failed to delete expense"),
        }
    }
}

fn failure_effects(reply: Result<ApiReply, ApiFailure>, fallback_message: &str) -> Vec<Effect> {
    let message = match reply {
        Err(failure) => {
            tracing::error!("{fallback_message}: {failure}");
            failure.user_message(fallback_message)
        }
        Ok(reply) => {
            tracing::error!("{fallback_message}: unexpected reply {reply:?}");
            fallback_message.to_owned()
        }
    };

    vec![Effect::Notify(Notification::error(&message))]
}
