use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use table_booking::app_system::{setup_tracing, BookingConfig, BookingSystem};
use table_booking::domain::{Contact, MenuType, OfferingCreate, TableCreate};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = BookingConfig::from_env();
    setup_tracing(&config.log_filter);

    info!("Starting booking demo");
    let system = BookingSystem::new(config);

    // Reference data
    for (name, capacity, kind) in [("Bar", 2, "counter"), ("Garden", 6, "terrace"), ("Window", 4, "indoor")] {
        system
            .table_client
            .create_table(TableCreate::new(name, capacity, kind))
            .await
            .map_err(|e| e.to_string())?;
    }
    system
        .menu_client
        .create_offering(OfferingCreate::new("Tasting", "Seven courses", Decimal::from(500)))
        .await
        .map_err(|e| e.to_string())?;

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).ok_or("invalid date")?;
    let time = NaiveTime::from_hms_opt(19, 0, 0).ok_or("invalid time")?;

    let span = tracing::info_span!("guest_wizard");
    let outcome = async {
        let mut wizard = system.new_wizard();
        let mut steps = wizard.watch_step();

        wizard.set_slot(date, time, 4).map_err(|e| e.to_string())?;
        wizard.advance().map_err(|e| e.to_string())?;
        let focused = *steps.borrow_and_update();
        info!(step = ?focused, "Focus moved");

        let offerings = wizard.fixed_menu_offerings().await.map_err(|e| e.to_string())?;
        let cart = wizard.cart_mut().map_err(|e| e.to_string())?;
        cart.select_menu_type(MenuType::FixedMenu, true);
        for offering in &offerings {
            cart.add_or_increment_fixed_menu(offering);
            cart.add_or_increment_fixed_menu(offering);
        }
        info!(totals = ?wizard.totals(), "Menu chosen");
        wizard.advance().map_err(|e| e.to_string())?;

        wizard.load_availability().await.map_err(|e| e.to_string())?;
        let free = wizard
            .availability()
            .and_then(|tables| tables.iter().find(|t| t.available))
            .map(|t| t.table.id.clone());
        if let Some(table_id) = free {
            wizard.select_table(&table_id).map_err(|e| e.to_string())?;
        }
        wizard.advance().map_err(|e| e.to_string())?;

        wizard
            .set_contact(Contact::new("Ada Lovelace", "ada@example.com", "+44 20 7946 0000"))
            .map_err(|e| e.to_string())?;
        wizard.advance().map_err(|e| e.to_string())?;

        if let Ok(summary) = serde_json::to_string(wizard.draft()) {
            info!(draft = %summary, "Reviewing draft");
        }
        wizard.submit().await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await;

    match outcome {
        Ok(reservation_id) => {
            info!(reservation_id = %reservation_id, "Reservation placed");
            if let Err(e) = system.confirm_reservation(reservation_id).await {
                error!(error = %e, "Confirmation failed");
            }
        }
        Err(e) => error!(error = %e, "Reservation failed"),
    }

    // Let the background notices land before reporting.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let sent = system.notification_client.sent().await.map_err(|e| e.to_string())?;
    info!(notice_count = sent.len(), "Notices delivered");

    system.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
