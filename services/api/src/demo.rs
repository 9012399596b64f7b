use crate::infra::build_store;
use chrono::{Local, NaiveDate};
use clap::Args;
use seal_registry::config::RegistryConfig;
use seal_registry::error::AppError;
use seal_registry::registry::{
    InMemoryRegistrationStore, Registration, RegistrationDraft, RegistrationService, SearchFilter,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Start from an empty store instead of the sample residents.
    #[arg(long)]
    pub(crate) skip_seed: bool,
    /// Override the registration and issue date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { skip_seed, today } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let config = RegistryConfig {
        seed_sample_data: !skip_seed,
        ..RegistryConfig::default()
    };
    let store = build_store(&config);
    let service = RegistrationService::new(store.clone(), &config).with_clock(move || today);

    println!("Seal registration demo ({today})");
    println!("- Store opened with {} record(s)", store.len());

    println!("\nImmediate registration (即時)");
    let immediate = service.register(&demo_draft("即時"), None)?;
    print_record(&immediate);

    println!("\nDeferred registration (照会)");
    let deferred = service.register(&demo_draft("照会"), None)?;
    print_record(&deferred);

    println!("\nSearch by name \"伊藤\"");
    let filter = SearchFilter {
        name: Some("伊藤".to_string()),
        ..SearchFilter::default()
    };
    for record in service.search(&filter)? {
        println!("  - {} {} [{}]", record.id, record.name, record.status);
    }

    println!("\nCertificate preview");
    let certificate = service.certificate(&immediate.id)?;
    for line in certificate.render_text().lines() {
        println!("  {line}");
    }

    println!("\nRevocation (抹消)");
    let revoked = service.revoke(&immediate.id)?;
    print_record(&revoked);
    if let Err(err) = service.certificate(&revoked.id) {
        println!("  Certificate refused: {err}");
    }

    print_store_summary(&store);
    Ok(())
}

fn demo_draft(method: &str) -> RegistrationDraft {
    RegistrationDraft {
        name: Some("伊藤 さくら".to_string()),
        name_kana: Some("イトウ サクラ".to_string()),
        date_of_birth: Some("平成12年2月29日".to_string()),
        gender: Some("女".to_string()),
        postal_code: Some("530-0001".to_string()),
        address: Some("大阪府大阪市北区梅田一丁目1番1号".to_string()),
        address_detail: None,
        mailing_number: Some("3000001".to_string()),
        household_number: Some("4000001".to_string()),
        seal_name: None,
        seal_name_category: Some("氏名".to_string()),
        registration_method: Some(method.to_string()),
    }
}

fn print_record(record: &Registration) {
    let number = record
        .registration_number
        .as_ref()
        .map(|number| number.as_str())
        .unwrap_or("-");
    let date = record
        .registration_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "- {} {} | 登録番号 {} | 登録日 {} | {}",
        record.id, record.name, number, date, record.status
    );
}

fn print_store_summary(store: &InMemoryRegistrationStore) {
    println!("\nStore now holds {} record(s)", store.len());
}
