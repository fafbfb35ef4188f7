// Unit tests for customer-manager
// These tests work with the public API without modifying the main codebase

use customer_manager::api::{Address, ApiError, Customer};
use customer_manager::app::update::{apply_api_event, handle_key};
use customer_manager::app::{ApiEvent, AppState, Command, Focus, InputMode, ModalState, Mode};
use customer_manager::form::{City, Country, FormField, FormState, StateCode};
use crossterm::event::KeyCode;

fn mk_customer(id: &str, name: &str, email: &str, phone: &str, city: &str, state: &str, country: &str) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        address: Address {
            city: city.to_string(),
            state: state.to_string(),
            country: country.to_string(),
        },
        image_url: None,
        video_url: None,
    }
}

fn mk_app(customers: Vec<Customer>) -> AppState {
    let mut app = AppState::default();
    app.customers = customers;
    app
}

/// Focus the form, put the cursor on Submit and press Enter.
fn press_submit(app: &mut AppState) -> Option<Command> {
    app.focus = Focus::Form;
    app.focused_field = FormField::Submit;
    handle_key(app, KeyCode::Enter)
}

fn fill_valid_form(app: &mut AppState) {
    app.form = FormState {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "5551234567".to_string(),
        city: City::Chicago,
        state: StateCode::Il,
        country: Country::Usa,
        terms_accepted: true,
        ..FormState::default()
    };
}

mod submission_tests {
    use super::*;

    #[test]
    fn empty_required_fields_block_submission_with_inline_errors() {
        let mut app = mk_app(vec![]);
        fill_valid_form(&mut app);
        app.form.name.clear();
        app.form.phone.clear();

        let cmd = press_submit(&mut app);

        assert_eq!(cmd, None);
        assert!(app.errors.iter().any(|e| e.field == FormField::Name));
        assert!(app.errors.iter().any(|e| e.field == FormField::Phone));
    }

    #[test]
    fn unaccepted_terms_block_submission_regardless_of_other_fields() {
        let mut app = mk_app(vec![]);
        fill_valid_form(&mut app);
        app.form.terms_accepted = false;

        assert_eq!(press_submit(&mut app), None);
        assert!(app.errors.iter().any(|e| e.field == FormField::Terms));
    }

    #[test]
    fn submit_is_ignored_while_a_submission_is_in_flight() {
        let mut app = mk_app(vec![]);
        fill_valid_form(&mut app);
        app.submit_in_flight = true;

        assert_eq!(press_submit(&mut app), None);
        assert!(app.errors.is_empty());
    }

    #[test]
    fn create_submission_carries_the_form_as_a_payload() {
        // The worked example: Jane Doe, no files, no prior selection.
        let mut app = mk_app(vec![]);
        fill_valid_form(&mut app);

        let cmd = press_submit(&mut app).expect("valid form must submit");
        let Command::Save { mode, payload } = cmd else {
            panic!("expected a save command");
        };
        assert_eq!(mode, Mode::Create);
        assert_eq!(payload.name, "Jane Doe");
        assert_eq!(payload.email, "jane@example.com");
        assert_eq!(payload.phone, "5551234567");
        assert_eq!(payload.city, "Chicago");
        assert_eq!(payload.state, "IL");
        assert_eq!(payload.country, "USA");
        assert!(payload.terms_accepted);
        assert!(payload.image.is_none());
        assert!(payload.video.is_none());
    }

    #[test]
    fn update_submission_is_addressed_to_the_selected_customer() {
        let mut app = mk_app(vec![mk_customer(
            "abc123", "Jane Doe", "jane@example.com", "5551234567", "Chicago", "IL", "USA",
        )]);

        // Select for edit from the list, then change the phone and submit.
        app.focus = Focus::List;
        handle_key(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Edit { id: "abc123".to_string() });
        app.form.phone = "5559999999".to_string();
        app.form.terms_accepted = true;

        let cmd = press_submit(&mut app).expect("valid form must submit");
        let Command::Save { mode, payload } = cmd else {
            panic!("expected a save command");
        };
        assert_eq!(mode, Mode::Edit { id: "abc123".to_string() });
        assert_eq!(payload.phone, "5559999999");
    }
}

mod selection_tests {
    use super::*;

    #[test]
    fn selecting_a_customer_prefills_all_but_terms_and_media() {
        let mut app = mk_app(vec![
            mk_customer("a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA"),
            mk_customer("b2", "Bob", "bob@example.com", "222", "Los Angeles", "CA", "Canada"),
        ]);
        app.focus = Focus::List;
        handle_key(&mut app, KeyCode::Down);
        handle_key(&mut app, KeyCode::Char('e'));

        assert_eq!(app.mode, Mode::Edit { id: "b2".to_string() });
        assert_eq!(app.form.name, "Bob");
        assert_eq!(app.form.city, City::LosAngeles);
        assert_eq!(app.form.country, Country::Canada);
        assert!(!app.form.terms_accepted);
        assert!(app.form.image.is_none());
        assert!(app.form.video.is_none());
        assert_eq!(app.focus, Focus::Form);
    }

    #[test]
    fn delete_key_requests_deletion_of_the_selected_customer() {
        let mut app = mk_app(vec![
            mk_customer("a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA"),
            mk_customer("b2", "Bob", "bob@example.com", "222", "Chicago", "IL", "USA"),
        ]);
        app.focus = Focus::List;
        app.selected_index = 1;

        let cmd = handle_key(&mut app, KeyCode::Char('d'));
        assert_eq!(cmd, Some(Command::Delete { id: "b2".to_string() }));
        // The list itself only changes on a fetch result.
        assert_eq!(app.customers.len(), 2);
    }

    #[test]
    fn delete_on_an_empty_list_is_a_no_op() {
        let mut app = mk_app(vec![]);
        app.focus = Focus::List;
        assert_eq!(handle_key(&mut app, KeyCode::Char('d')), None);
    }

    #[test]
    fn new_record_key_resets_to_create_mode() {
        let mut app = mk_app(vec![mk_customer(
            "a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA",
        )]);
        app.focus = Focus::List;
        handle_key(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Edit { .. }));

        app.focus = Focus::List;
        handle_key(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Create);
        assert_eq!(app.form, FormState::default());
    }
}

mod api_event_tests {
    use super::*;

    fn status_error(verb: &'static str) -> ApiError {
        ApiError::Status {
            verb,
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[test]
    fn successful_save_resets_the_form_and_triggers_exactly_one_fetch() {
        let mut app = mk_app(vec![]);
        fill_valid_form(&mut app);
        app.submit_in_flight = true;

        let saved = mk_customer("new1", "Jane Doe", "jane@example.com", "5551234567", "Chicago", "IL", "USA");
        let follow_up = apply_api_event(&mut app, ApiEvent::Saved(Ok(saved)));

        assert_eq!(follow_up, Some(Command::Fetch));
        assert_eq!(app.form, FormState::default());
        assert_eq!(app.mode, Mode::Create);
        assert!(!app.submit_in_flight);
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
    }

    #[test]
    fn successful_update_clears_the_selection() {
        let mut app = mk_app(vec![]);
        fill_valid_form(&mut app);
        app.mode = Mode::Edit { id: "abc123".to_string() };
        app.submit_in_flight = true;

        let saved = mk_customer("abc123", "Jane Doe", "jane@example.com", "5559999999", "Chicago", "IL", "USA");
        let follow_up = apply_api_event(&mut app, ApiEvent::Saved(Ok(saved)));

        assert_eq!(follow_up, Some(Command::Fetch));
        assert_eq!(app.mode, Mode::Create);
    }

    #[test]
    fn failed_save_keeps_the_form_and_the_list() {
        let mut app = mk_app(vec![mk_customer(
            "a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA",
        )]);
        fill_valid_form(&mut app);
        app.mode = Mode::Edit { id: "a1".to_string() };
        app.submit_in_flight = true;

        let follow_up = apply_api_event(&mut app, ApiEvent::Saved(Err(status_error("save"))));

        assert_eq!(follow_up, None);
        assert_eq!(app.form.name, "Jane Doe");
        assert_eq!(app.mode, Mode::Edit { id: "a1".to_string() });
        assert_eq!(app.customers.len(), 1);
        assert!(!app.submit_in_flight);
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
    }

    #[test]
    fn successful_delete_triggers_a_fetch_without_touching_the_form() {
        let mut app = mk_app(vec![]);
        fill_valid_form(&mut app);

        let follow_up = apply_api_event(&mut app, ApiEvent::Deleted(Ok(())));

        assert_eq!(follow_up, Some(Command::Fetch));
        assert_eq!(app.form.name, "Jane Doe");
    }

    #[test]
    fn failed_delete_leaves_the_list_unchanged() {
        let mut app = mk_app(vec![mk_customer(
            "a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA",
        )]);

        let follow_up = apply_api_event(&mut app, ApiEvent::Deleted(Err(status_error("delete"))));

        assert_eq!(follow_up, None);
        assert_eq!(app.customers.len(), 1);
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
    }

    #[test]
    fn fetch_success_replaces_the_snapshot_and_clamps_the_cursor() {
        let mut app = mk_app(vec![
            mk_customer("a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA"),
            mk_customer("b2", "Bob", "bob@example.com", "222", "Chicago", "IL", "USA"),
        ]);
        app.selected_index = 1;
        app.fetches_in_flight = 1;

        let fresh = vec![mk_customer("b2", "Bob", "bob@example.com", "222", "Chicago", "IL", "USA")];
        apply_api_event(&mut app, ApiEvent::Fetched(Ok(fresh)));

        assert_eq!(app.customers.len(), 1);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.fetches_in_flight, 0);
    }

    #[test]
    fn fetch_failure_keeps_the_previous_snapshot() {
        let mut app = mk_app(vec![mk_customer(
            "a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA",
        )]);

        apply_api_event(&mut app, ApiEvent::Fetched(Err(status_error("fetch"))));

        assert_eq!(app.customers.len(), 1);
        assert_eq!(app.customers[0].id, "a1");
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
    }

    #[test]
    fn overlapping_fetches_resolve_last_response_wins() {
        let mut app = mk_app(vec![]);
        app.fetches_in_flight = 2;

        let first = vec![mk_customer("a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA")];
        let second = vec![
            mk_customer("a1", "Alice", "alice@example.com", "111", "New York", "NY", "USA"),
            mk_customer("b2", "Bob", "bob@example.com", "222", "Chicago", "IL", "USA"),
        ];
        // Arrival order is all that matters, not issuance order.
        apply_api_event(&mut app, ApiEvent::Fetched(Ok(second)));
        apply_api_event(&mut app, ApiEvent::Fetched(Ok(first)));

        assert_eq!(app.customers.len(), 1);
        assert_eq!(app.fetches_in_flight, 0);
    }
}

mod input_tests {
    use super::*;

    #[test]
    fn text_entry_feeds_the_focused_field() {
        let mut app = mk_app(vec![]);
        app.focus = Focus::Form;
        app.focused_field = FormField::Name;
        handle_key(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::EditField);

        for c in "Jane".chars() {
            handle_key(&mut app, KeyCode::Char(c));
        }
        handle_key(&mut app, KeyCode::Backspace);
        handle_key(&mut app, KeyCode::Enter);

        assert_eq!(app.form.name, "Jan");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn select_fields_cycle_through_their_options() {
        let mut app = mk_app(vec![]);
        app.focus = Focus::Form;
        app.focused_field = FormField::City;
        handle_key(&mut app, KeyCode::Right);
        assert_eq!(app.form.city, City::LosAngeles);
        handle_key(&mut app, KeyCode::Left);
        handle_key(&mut app, KeyCode::Left);
        assert_eq!(app.form.city, City::Chicago);
    }

    #[test]
    fn space_toggles_terms_acceptance() {
        let mut app = mk_app(vec![]);
        app.focus = Focus::Form;
        app.focused_field = FormField::Terms;
        handle_key(&mut app, KeyCode::Char(' '));
        assert!(app.form.terms_accepted);
        handle_key(&mut app, KeyCode::Char(' '));
        assert!(!app.form.terms_accepted);
    }

    #[test]
    fn fixing_a_field_clears_its_inline_error() {
        let mut app = mk_app(vec![]);
        fill_valid_form(&mut app);
        app.form.terms_accepted = false;
        press_submit(&mut app);
        assert!(app.errors.iter().any(|e| e.field == FormField::Terms));

        app.input_mode = InputMode::Normal;
        app.focused_field = FormField::Terms;
        handle_key(&mut app, KeyCode::Char(' '));
        assert!(app.errors.is_empty());
    }
}
