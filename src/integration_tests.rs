#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    use crate::actor_framework::ResourceActor;
    use crate::actors::NotificationService;
    use crate::app_system::{BookingConfig, BookingSystem};
    use crate::booking::{AvailabilityResolver, ReservationSubmitter, WizardController, WizardStep};
    use crate::clients::{MenuClient, NotificationClient, ReservationClient, TableClient};
    use crate::domain::{
        Contact, DiningTable, FixedMenuOffering, MenuType, OfferingCreate, Reservation,
        ReservationNotice, ReservationStatus, TableCreate, TableId,
    };
    use crate::error::BookingError;
    use crate::mock_framework::{create_mock_client, expect_list};

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn at(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn test_config() -> BookingConfig {
        BookingConfig {
            check_timeout: Duration::from_millis(500),
            ..BookingConfig::default()
        }
    }

    async fn seed_tables(system: &BookingSystem, tables: &[(&str, u32)]) -> Vec<TableId> {
        let mut ids = Vec::new();
        for (name, capacity) in tables {
            let id = system
                .table_client
                .create_table(TableCreate::new(*name, *capacity, "indoor"))
                .await
                .unwrap();
            ids.push(id);
        }
        ids
    }

    async fn seed_menu(system: &BookingSystem) -> FixedMenuOffering {
        let id = system
            .menu_client
            .create_offering(OfferingCreate::new("Tasting", "Seven courses", Decimal::from(500)))
            .await
            .unwrap();
        system.menu_client.get_offering(id).await.unwrap().unwrap()
    }

    async fn wait_for_notices(client: &NotificationClient, count: usize) -> Vec<ReservationNotice> {
        for _ in 0..50 {
            let sent = client.sent().await.unwrap();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Expected {} notices", count);
    }

    /// Walks a wizard up to the table step for party of `party_size` at `hour`.
    async fn wizard_at_tables(system: &BookingSystem, hour: u32, party_size: u32) -> WizardController {
        let mut wizard = system.new_wizard();
        wizard.set_slot(may_first(), at(hour), party_size).unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WizardStep::TableSelection);
        assert!(wizard.load_availability().await.unwrap());
        wizard
    }

    fn finish_and_review(wizard: &mut WizardController, name: &str) {
        wizard.advance().unwrap();
        wizard
            .set_contact(Contact::new(name, format!("{}@example.com", name.to_lowercase()), "555-0100"))
            .unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WizardStep::Review);
    }

    #[tokio::test]
    async fn test_full_reservation_flow() {
        let system = BookingSystem::new(test_config());
        let table_ids = seed_tables(&system, &[("Window", 4), ("Bar", 2)]).await;
        let offering = seed_menu(&system).await;

        let mut wizard = system.new_wizard();
        let mut steps = wizard.watch_step();

        wizard.set_slot(may_first(), at(19), 3).unwrap();
        assert_eq!(wizard.advance(), Ok(WizardStep::MenuSelection));
        assert!(steps.has_changed().unwrap());
        assert_eq!(*steps.borrow_and_update(), WizardStep::MenuSelection);

        let offerings = wizard.fixed_menu_offerings().await.unwrap();
        assert_eq!(offerings, vec![offering.clone()]);
        let cart = wizard.cart_mut().unwrap();
        cart.select_menu_type(MenuType::FixedMenu, true);
        cart.add_or_increment_fixed_menu(&offering);
        cart.add_or_increment_fixed_menu(&offering);
        assert_eq!(wizard.totals().total, Decimal::from(900));
        wizard.advance().unwrap();

        assert!(wizard.load_availability().await.unwrap());
        let shown: Vec<_> = wizard.availability().unwrap().iter().map(|t| t.table.id.clone()).collect();
        assert_eq!(shown, vec![table_ids[0].clone()]);
        wizard.select_table(&table_ids[0]).unwrap();

        finish_and_review(&mut wizard, "Ada");
        let id = wizard.submit().await.unwrap();
        assert_eq!(wizard.step(), WizardStep::Submitted);
        assert!(wizard.cart_mut().is_err());

        let stored = system.reservation_client.get_reservation(id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Pending);
        assert_eq!(stored.table_id, Some(table_ids[0].clone()));
        assert_eq!(stored.fixed_menus.len(), 1);
        assert_eq!(stored.fixed_menus[0].quantity, 2);
        assert_eq!(stored.totals.discount_amount, Decimal::from(100));

        let notices = wait_for_notices(&system.notification_client, 1).await;
        assert_eq!(notices[0].reservation_id, id);
        assert_eq!(notices[0].status, ReservationStatus::Pending);
        assert_eq!(notices[0].table_info.as_deref(), Some("Window"));
        assert_eq!(notices[0].guests, 3);

        drop(wizard);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_step_guards() {
        let system = BookingSystem::new(test_config());
        let mut wizard = system.new_wizard();

        assert_eq!(wizard.retreat(), Err(BookingError::InvalidStep(WizardStep::DateTime)));
        match wizard.advance() {
            Err(BookingError::Validation { field, .. }) => assert_eq!(field, "party_size"),
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(wizard.step(), WizardStep::DateTime);

        // Menu type defaults once, on first entry to the menu step.
        assert!(!wizard.cart().is_chosen());
        wizard.set_slot(may_first(), at(19), 2).unwrap();
        wizard.advance().unwrap();
        assert!(wizard.cart().is_chosen());
        assert_eq!(wizard.cart().menu_type(), MenuType::AtRestaurant);

        wizard.cart_mut().unwrap().select_menu_type(MenuType::ALaCarte, true);
        match wizard.advance() {
            Err(BookingError::Validation { field, .. }) => assert_eq!(field, "menu_selection"),
            other => panic!("Unexpected result: {:?}", other),
        }
        wizard.retreat().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.cart().menu_type(), MenuType::ALaCarte);

        // Unchecking the only active type falls back to ordering at the table.
        wizard.cart_mut().unwrap().select_menu_type(MenuType::ALaCarte, false);
        assert_eq!(wizard.cart().menu_type(), MenuType::AtRestaurant);
        wizard.advance().unwrap();

        // Table is optional; contact is not.
        wizard.advance().unwrap();
        match wizard.advance() {
            Err(BookingError::Validation { field, .. }) => assert_eq!(field, "contact.name"),
            other => panic!("Unexpected result: {:?}", other),
        }

        wizard.set_contact(Contact::new("Ada", "ada@example.com", "555-0100")).unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.advance(), Err(BookingError::InvalidStep(WizardStep::Review)));

        drop(wizard);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_only_tables_seating_the_party_are_checked() {
        let system = BookingSystem::new(test_config());
        seed_tables(&system, &[("A", 2), ("B", 4), ("C", 6)]).await;

        let wizard = wizard_at_tables(&system, 19, 4).await;
        let shown: Vec<_> = wizard
            .availability()
            .unwrap()
            .iter()
            .map(|t| (t.table.name.as_str(), t.table.capacity, t.available))
            .collect();
        assert_eq!(shown, vec![("B", 4, true), ("C", 6, true)]);

        drop(wizard);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_resolution_is_never_shown() {
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicU64::new(1));
        let next_id = move || format!("table_{}", counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst));
        let (table_actor, table_inner) = ResourceActor::<DiningTable>::new(10, next_id);
        tokio::spawn(table_actor.run());
        let tables = TableClient::new(table_inner);
        tables.create_table(TableCreate::new("Window", 4, "indoor")).await.unwrap();

        let (reservation_inner, mut reservation_rx) = create_mock_client::<Reservation>(10);
        let reservations = ReservationClient::new(reservation_inner);
        let (menu_inner, _menu_rx) = create_mock_client::<FixedMenuOffering>(10);
        let (notification_service, notifier) = NotificationService::new(10);
        tokio::spawn(notification_service.run());

        let resolver = AvailabilityResolver::new(tables.clone(), reservations.clone(), Duration::from_secs(1));
        let submitter = ReservationSubmitter::new(reservations, tables, notifier, Duration::from_secs(1));
        let mut wizard = WizardController::new(resolver, submitter, MenuClient::new(menu_inner));

        wizard.set_slot(may_first(), at(19), 2).unwrap();
        let seven = tokio::spawn(wizard.request_availability().unwrap());
        wizard.set_slot(may_first(), at(20), 2).unwrap();
        let eight = tokio::spawn(wizard.request_availability().unwrap());

        // The 19:00 slot reports the table free, the 20:00 slot reports it taken.
        for _ in 0..2 {
            let (query, responder) = expect_list(&mut reservation_rx).await.expect("Expected check");
            let holders = if query.time == Some(at(20)) {
                vec![reservation_holding("table_1", at(20))]
            } else {
                Vec::new()
            };
            responder.send(Ok(holders)).unwrap();
        }

        let seven = seven.await.unwrap().unwrap();
        let eight = eight.await.unwrap().unwrap();

        assert!(!wizard.apply_availability(seven.clone()));
        assert!(wizard.availability().is_none());
        assert!(wizard.apply_availability(eight));
        assert!(!wizard.apply_availability(seven));

        let shown = wizard.availability().unwrap();
        assert_eq!(shown.len(), 1);
        assert!(!shown[0].available);
        assert!(wizard.select_table("table_1").is_err());
    }

    #[tokio::test]
    async fn test_table_claimed_between_proposal_and_submit() {
        let system = BookingSystem::new(test_config());
        let table_ids = seed_tables(&system, &[("T1", 4), ("T2", 4)]).await;

        let mut slow = wizard_at_tables(&system, 19, 2).await;
        slow.select_table(&table_ids[0]).unwrap();
        finish_and_review(&mut slow, "Ada");

        let mut fast = wizard_at_tables(&system, 19, 2).await;
        fast.select_table(&table_ids[0]).unwrap();
        finish_and_review(&mut fast, "Bo");
        fast.submit().await.unwrap();

        let result = slow.submit().await;
        assert_eq!(result, Err(BookingError::TableUnavailable(table_ids[0].clone())));
        assert!(result.unwrap_err().is_retryable());

        // Draft intact, lost table now shown as taken.
        assert_eq!(slow.step(), WizardStep::Review);
        assert_eq!(slow.draft().table_id, Some(table_ids[0].clone()));
        assert_eq!(slow.draft().contact.name, "Ada");
        let first = &slow.availability().unwrap()[0];
        assert_eq!(first.table.id, table_ids[0]);
        assert!(!first.available);

        slow.retreat().unwrap();
        slow.retreat().unwrap();
        assert_eq!(slow.step(), WizardStep::TableSelection);
        slow.select_table(&table_ids[1]).unwrap();
        slow.advance().unwrap();
        slow.advance().unwrap();
        let id = slow.submit().await.unwrap();

        let stored = system.reservation_client.get_reservation(id).await.unwrap().unwrap();
        assert_eq!(stored.table_id, Some(table_ids[1].clone()));

        drop(slow);
        drop(fast);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_submits_book_a_table_once() {
        let system = BookingSystem::new(test_config());
        let table_ids = seed_tables(&system, &[("T1", 4)]).await;

        let mut first = wizard_at_tables(&system, 19, 2).await;
        first.select_table(&table_ids[0]).unwrap();
        finish_and_review(&mut first, "Ada");

        let mut second = wizard_at_tables(&system, 19, 2).await;
        second.select_table(&table_ids[0]).unwrap();
        finish_and_review(&mut second, "Bo");

        let (a, b) = tokio::join!(first.submit(), second.submit());
        let (winner, error, won, lost) = match (a, b) {
            (Ok(id), Err(e)) => (id, e, &first, &second),
            (Err(e), Ok(id)) => (id, e, &second, &first),
            other => panic!("Expected exactly one booking, got {:?}", other),
        };
        assert_eq!(error, BookingError::TableUnavailable(table_ids[0].clone()));

        assert_eq!(won.step(), WizardStep::Submitted);
        assert_eq!(lost.step(), WizardStep::Review);
        assert_eq!(lost.draft().table_id, Some(table_ids[0].clone()));
        assert!(!lost.availability().unwrap()[0].available);

        let stored = system.reservation_client.get_reservation(winner).await.unwrap().unwrap();
        assert_eq!(stored.table_id, Some(table_ids[0].clone()));
        assert!(!system
            .reservation_client
            .check_table_availability(table_ids[0].clone(), may_first(), at(19))
            .await
            .unwrap());

        drop(first);
        drop(second);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_notification_failure_never_surfaces() {
        let (service, client) = NotificationService::failing(8);
        let system = BookingSystem::with_notifications(test_config(), service, client);
        seed_tables(&system, &[("T1", 4)]).await;

        let mut wizard = wizard_at_tables(&system, 19, 2).await;
        finish_and_review(&mut wizard, "Ada");
        let id = wizard.submit().await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        let stored = system.reservation_client.get_reservation(id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Pending);
        assert!(system.notification_client.sent().await.unwrap().is_empty());

        drop(wizard);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_live_changes_update_shown_availability() {
        let system = BookingSystem::new(test_config());
        let table_ids = seed_tables(&system, &[("T1", 4)]).await;

        let mut watcher = wizard_at_tables(&system, 19, 2).await;
        watcher.watch_reservations(&system.reservation_client).await.unwrap();
        assert!(watcher.availability().unwrap()[0].available);

        let mut other = wizard_at_tables(&system, 19, 2).await;
        other.select_table(&table_ids[0]).unwrap();
        finish_and_review(&mut other, "Bo");
        let id = other.submit().await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(watcher.sync_reservation_changes(), 1);
        assert!(!watcher.availability().unwrap()[0].available);

        let cancelled = system.cancel_reservation(id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(watcher.sync_reservation_changes(), 1);
        assert!(watcher.availability().unwrap()[0].available);

        // A cancelled booking no longer blocks the table.
        let fresh = wizard_at_tables(&system, 19, 2).await;
        assert!(fresh.availability().unwrap()[0].available);

        drop(watcher);
        drop(other);
        drop(fresh);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_status_changes_notify_guest() {
        let system = BookingSystem::new(test_config());
        seed_tables(&system, &[("T1", 4)]).await;

        let mut wizard = wizard_at_tables(&system, 19, 2).await;
        finish_and_review(&mut wizard, "Ada");
        let id = wizard.submit().await.unwrap();

        let confirmed = system.confirm_reservation(id.clone()).await.unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        system.cancel_reservation(id.clone()).await.unwrap();
        assert!(system.confirm_reservation(id).await.is_err());

        let notices = wait_for_notices(&system.notification_client, 3).await;
        let mut statuses: Vec<String> = notices.iter().map(|n| n.status.to_string()).collect();
        statuses.sort();
        assert_eq!(statuses, vec!["Cancelled", "Confirmed", "Pending"]);

        drop(wizard);
        system.shutdown().await.unwrap();
    }

    fn reservation_holding(table_id: &str, time: NaiveTime) -> Reservation {
        use crate::domain::Totals;
        Reservation {
            id: "reservation_9".into(),
            party_size: 2,
            date: may_first(),
            time,
            menu_type: MenuType::AtRestaurant,
            a_la_carte_items: Vec::new(),
            fixed_menus: Vec::new(),
            table_id: Some(table_id.into()),
            totals: Totals::default(),
            contact: Contact::new("Cy", "cy@example.com", "555-0102"),
            status: ReservationStatus::Pending,
            created_at: chrono::Utc::now(),
        }
    }
}
