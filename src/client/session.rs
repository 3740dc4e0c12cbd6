//! Drives an [ExpenseController] against a real API and user interface.

use std::collections::VecDeque;

use crate::{
    client::{
        api::{ExpenseApi, send},
        controller::{Effect, ExpenseController, Notification, Request},
    },
    expense::ExpenseForm,
};

/// The question asked before an expense is deleted.
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this expense?";

/// The parts of the user interface the session talks to.
pub trait ExpenseUi {
    /// Ask the user a yes or no question.
    fn confirm(&mut self, question: &str) -> bool;

    /// Show a message to the user.
    fn notify(&mut self, notification: &Notification);

    /// Redraw the list, total and form.
    fn render(&mut self, controller: &ExpenseController);
}

/// A user's session with the expense tracker.
///
/// Each action sends its request and every request that follows from it
/// before returning.
#[derive(Debug)]
pub struct ExpenseSession<A, U> {
    api: A,
    ui: U,
    controller: ExpenseController,
}

impl<A, U> ExpenseSession<A, U>
where
    A: ExpenseApi,
    U: ExpenseUi,
{
    /// Create a session that has not loaded any expenses yet.
    pub fn new(api: A, ui: U) -> Self {
        Self {
            api,
            ui,
            controller: ExpenseController::new(),
        }
    }

    /// The state of the list and form.
    pub fn controller(&self) -> &ExpenseController {
        &self.controller
    }

    /// The user interface.
    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Load and show the list of expenses.
    pub async fn start(&mut self) {
        let request = self.controller.load();
        self.dispatch(request).await;
    }

    /// Load the expense `id` into the form.
    pub async fn edit(&mut self, id: &str) {
        let request = self.controller.edit(id);
        self.dispatch(request).await;
    }

    /// Stop editing and clear the form.
    pub fn cancel(&mut self) {
        self.controller.cancel();
        self.ui.render(&self.controller);
    }

    /// Submit the form.
    pub async fn submit(&mut self, form: ExpenseForm) {
        let request = self.controller.submit(form);
        self.dispatch(request).await;
    }

    /// Delete the expense `id` if the user confirms.
    pub async fn delete(&mut self, id: &str) {
        if !self.ui.confirm(DELETE_CONFIRMATION) {
            return;
        }

        let request = self.controller.delete(id);
        self.dispatch(request).await;
    }

    async fn dispatch(&mut self, request: Request) {
        let mut queue = VecDeque::from([request]);

        while let Some(request) = queue.pop_front() {
            tracing::debug!("Sending {:?}", request.call);
            let reply = send(&self.api, request.call).await;

            for effect in self.controller.handle_reply(request.id, reply) {
                match effect {
                    Effect::Send(request) => queue.push_back(request),
                    Effect::Notify(notification) => self.ui.notify(&notification),
                    Effect::Render => self.ui.render(&self.controller),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        AppState, build_router,
        client::{
            FormMode, Notification, RouterClient,
            controller::{ExpenseController, NotificationKind},
        },
        expense::{ExpenseForm, MemoryExpenseStore},
        storage::Storage,
    };

    use super::{DELETE_CONFIRMATION, ExpenseSession, ExpenseUi};

    #[derive(Debug, Default)]
    struct RecordingUi {
        decline_confirmation: bool,
        questions: Vec<String>,
        notifications: Vec<Notification>,
        rendered_totals: Vec<String>,
    }

    impl ExpenseUi for RecordingUi {
        fn confirm(&mut self, question: &str) -> bool {
            self.questions.push(question.to_owned());
            !self.decline_confirmation
        }

        fn notify(&mut self, notification: &Notification) {
            self.notifications.push(notification.clone());
        }

        fn render(&mut self, controller: &ExpenseController) {
            self.rendered_totals.push(controller.formatted_total());
        }
    }

    async fn get_started_session(ui: RecordingUi) -> ExpenseSession<RouterClient, RecordingUi> {
        let state = AppState::new(Storage::Transient(MemoryExpenseStore::with_seed_data()));
        let mut session = ExpenseSession::new(RouterClient::new(build_router(state)), ui);
        session.start().await;
        session
    }

    #[track_caller]
    fn assert_last_notification(
        session: &ExpenseSession<RouterClient, RecordingUi>,
        kind: NotificationKind,
        message: &str,
    ) {
        let notification = session
            .ui()
            .notifications
            .last()
            .expect("expected a notification");
        assert_eq!(notification.kind, kind);
        assert_eq!(notification.message, message);
    }

    #[tokio::test]
    async fn start_shows_seed_data_and_total() {
        let session = get_started_session(RecordingUi::default()).await;

        assert_eq!(session.controller().expenses().len(), 3);
        assert_eq!(session.ui().rendered_totals, vec!["120.50"]);
        assert!(session.ui().notifications.is_empty());
    }

    #[tokio::test]
    async fn adding_expense_reloads_list() {
        let mut session = get_started_session(RecordingUi::default()).await;

        session
            .submit(ExpenseForm::new("Coffee", 4.5, "Food"))
            .await;

        assert_last_notification(
            &session,
            NotificationKind::Success,
            "Expense added successfully!",
        );
        let expenses = session.controller().expenses();
        assert_eq!(expenses.len(), 4);
        assert_eq!(expenses[3].description, "Coffee");
        assert_eq!(session.controller().formatted_total(), "125.00");
        assert_eq!(session.controller().form(), &ExpenseForm::default());
    }

    #[tokio::test]
    async fn editing_expense_updates_it_in_place() {
        let mut session = get_started_session(RecordingUi::default()).await;

        session.edit("2").await;
        assert_eq!(
            session.controller().form(),
            &ExpenseForm::new("Gas", 40.0, "Transportation")
        );
        assert_eq!(session.controller().submit_label(), "Update Expense");

        session
            .submit(ExpenseForm::new("Gas", 45.0, "Transportation"))
            .await;

        assert_last_notification(
            &session,
            NotificationKind::Success,
            "Expense updated successfully!",
        );
        assert_eq!(session.controller().mode(), &FormMode::Adding);
        assert_eq!(session.controller().expenses().len(), 3);
        assert_eq!(session.controller().expenses()[1].amount, 45.0);
        assert_eq!(session.controller().formatted_total(), "125.50");
    }

    #[tokio::test]
    async fn cancelling_edit_clears_form() {
        let mut session = get_started_session(RecordingUi::default()).await;
        session.edit("1").await;

        session.cancel();

        assert_eq!(session.controller().mode(), &FormMode::Adding);
        assert_eq!(session.controller().form(), &ExpenseForm::default());
        assert_eq!(session.controller().submit_label(), "Add Expense");
    }

    #[tokio::test]
    async fn confirmed_delete_removes_expense() {
        let mut session = get_started_session(RecordingUi::default()).await;

        session.delete("3").await;

        assert_eq!(session.ui().questions, vec![DELETE_CONFIRMATION]);
        assert_last_notification(
            &session,
            NotificationKind::Success,
            "Expense deleted successfully!",
        );
        assert_eq!(session.controller().expenses().len(), 2);
        assert_eq!(session.controller().formatted_total(), "90.50");
    }

    #[tokio::test]
    async fn declined_delete_does_nothing() {
        let ui = RecordingUi {
            decline_confirmation: true,
            ..RecordingUi::default()
        };
        let mut session = get_started_session(ui).await;

        session.delete("3").await;

        assert_eq!(session.ui().questions, vec![DELETE_CONFIRMATION]);
        assert!(session.ui().notifications.is_empty());
        assert_eq!(session.ui().rendered_totals.len(), 1);

        session.start().await;
        assert_eq!(session.controller().expenses().len(), 3);
    }

    #[tokio::test]
    async fn editing_missing_expense_reports_error() {
        let mut session = get_started_session(RecordingUi::default()).await;

        session.edit("999").await;

        assert_last_notification(&session, NotificationKind::Error, "Expense not found");
        assert_eq!(session.controller().mode(), &FormMode::Adding);
    }

    #[tokio::test]
    async fn invalid_submission_keeps_form() {
        let mut session = get_started_session(RecordingUi::default()).await;
        let form = ExpenseForm {
            category: None,
            ..ExpenseForm::new("Coffee", 4.5, "Food")
        };

        session.submit(form.clone()).await;

        assert_last_notification(
            &session,
            NotificationKind::Error,
            "Description, amount, and category are required",
        );
        assert_eq!(session.controller().form(), &form);
        assert_eq!(session.controller().expenses().len(), 3);
    }
}
