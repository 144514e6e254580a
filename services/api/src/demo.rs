use crate::infra::{build_desk, load_calendar, parse_date, InMemorySubmissionGateway};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use villa_booking::config::AppConfig;
use villa_booking::error::AppError;
use villa_booking::telemetry;
use villa_booking::workflows::booking::{
    BookingSummary, GuestDraft, PromoNotice, StayRequest,
};

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: NaiveDate,
    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_out: NaiveDate,
    /// Promo code to try against the catalog
    #[arg(long)]
    pub(crate) promo_code: Option<String>,
    /// Redemption date for the promo window (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Availability export to check the stay against
    #[arg(long)]
    pub(crate) calendar_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First night of the sample stay (defaults to 30 days from today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: Option<NaiveDate>,
    /// Number of nights in the sample stay
    #[arg(long, default_value_t = 3)]
    pub(crate) nights: u32,
    /// Promo code applied during the walkthrough
    #[arg(long, default_value = "SUMMER25")]
    pub(crate) promo_code: String,
    /// Redemption date for the promo window (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let calendar = load_calendar(args.calendar_csv.as_deref())?;
    let desk = build_desk(
        &config.booking,
        calendar,
        Arc::new(InMemorySubmissionGateway::default()),
    );

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let stay = StayRequest {
        check_in: args.check_in,
        check_out: args.check_out,
        promo_code: args.promo_code,
    };
    let quote = desk.quote(&stay, today)?;

    render_summary(&quote.summary);
    if let Some(notice) = &quote.promo_notice {
        render_notice(notice);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let gateway = Arc::new(InMemorySubmissionGateway::default());
    let desk = build_desk(&config.booking, load_calendar(None)?, gateway.clone());

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let check_in = args
        .check_in
        .unwrap_or_else(|| today + chrono::Duration::days(30));
    let check_out = check_in + chrono::Duration::days(i64::from(args.nights.max(1)));

    println!("Villa booking demo: {}", desk.listing().name);
    let mut workflow = desk.start_session();

    println!("\n[1] {}", workflow.step().label());
    workflow.select_date(check_in)?;
    workflow.select_date(check_out)?;
    println!("- Stay {check_in} -> {check_out} ({} nights)", workflow.session().nights());
    workflow.continue_to_promo()?;

    println!("\n[2] {}", workflow.step().label());
    match workflow.apply_promo(&args.promo_code, today) {
        Ok(promo) => println!("- {} accepted", promo.code),
        Err(err) => println!("- {} not applied: {err}", args.promo_code),
    }
    if let Some(notice) = workflow.session().promo_notice() {
        render_notice(notice);
    }
    workflow.continue_to_info()?;

    println!("\n[3] {}", workflow.step().label());
    workflow.update_guest(demo_guest())?;
    let reference = workflow.submit().await?;

    println!("\n[4] {}", workflow.step().label());
    if let Some(summary) = workflow.summary() {
        render_summary(&summary);
    }
    println!("Booking reference: {reference}");
    println!("Requests handed to the reservation desk: {}", gateway.accepted().len());

    Ok(())
}

// Workflow events go through the same subscriber the server installs.
fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn demo_guest() -> GuestDraft {
    GuestDraft {
        full_name: "Ayu Lestari".to_string(),
        email: "ayu.lestari@example.com".to_string(),
        phone: "+62 812 0000 1111".to_string(),
        id_number: "3171234567890001".to_string(),
        number_of_guests: 4,
        special_requests: "Airport pickup".to_string(),
    }
}

fn render_summary(summary: &BookingSummary) {
    println!(
        "{} ({}) | {} -> {} | {} night(s)",
        summary.villa_name, summary.villa_id, summary.check_in, summary.check_out, summary.nights
    );
    for line in &summary.price_lines {
        println!("  {:<32} {:>20}", line.label, line.amount);
    }
    if let Some(guest) = &summary.guest {
        println!(
            "  Guest: {} ({} guest(s), {})",
            guest.full_name, guest.number_of_guests, guest.email
        );
    }
}

fn render_notice(notice: &PromoNotice) {
    let marker = if notice.is_error() { "!" } else { "+" };
    println!("  [{marker}] {}", notice.message());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_commands_install_the_subscriber() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }

        load_config().expect("default config loads");
        assert!(tracing::dispatcher::has_been_set());
    }
}
