//! risk-sensitivities CLI
//!
//! Convert, aggregate and report parameter sensitivities from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Re-express every sensitivity in USD
//! risk-sensitivities convert --input sensitivities.json --currency USD
//!
//! # Totals per currency, as JSON
//! risk-sensitivities total --input sensitivities.json --format json
//!
//! # PV01, optionally reported in one currency
//! risk-sensitivities pv01 --input sensitivities.json --currency USD
//!
//! # Expand a bullet payment
//! risk-sensitivities payment --direction pay --amount 100 --currency USD --date 2024-01-06
//!
//! # Generate a random sensitivity file for testing
//! risk-sensitivities generate --curves 10 --parameters 20
//! ```

use chrono::NaiveDate;
use log::debug;
use risk_sensitivities::basics::amount::CurrencyAmount;
use risk_sensitivities::basics::currency::{CurrencyCode, FxConvertible, FxRateTable};
use risk_sensitivities::basics::date::{
    AdjustableDate, BusinessDayAdjustment, BusinessDayConvention, HolidayCalendar,
};
use risk_sensitivities::market::metadata::ParameterMetadata;
use risk_sensitivities::market::name::{MarketDataKind, MarketDataName};
use risk_sensitivities::market::sensitivities::CurrencyParameterSensitivities;
use risk_sensitivities::market::sensitivity::CurrencyParameterSensitivity;
use risk_sensitivities::measure::pv01::{bucketed_pv01, pv01, pv01_in};
use risk_sensitivities::product::payment::{BulletPayment, PayReceive};
use risk_sensitivities::simulation::generator::{generate_random_sensitivities, SensitivityConfig};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"risk-sensitivities: currency-aware parameter sensitivities

USAGE:
    risk-sensitivities <COMMAND> [OPTIONS]

COMMANDS:
    convert     Re-express every sensitivity in one currency
    total       Sum sensitivities per currency
    pv01        Report PV01 and bucketed PV01
    payment     Expand a bullet payment into a signed, adjusted payment
    generate    Generate a random sensitivity file (for testing)
    help        Show this message

OPTIONS (convert, total, pv01):
    --input <FILE>      Path to JSON sensitivities file
    --currency <CCY>    Target currency (required for convert)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (payment):
    --direction <D>     pay or receive
    --amount <N>        Unsigned amount
    --currency <CCY>    Currency of the amount
    --date <DATE>       Unadjusted payment date, YYYY-MM-DD
    --convention <C>    none, following (default), modified-following,
                        preceding, modified-preceding

OPTIONS (generate):
    --curves <N>        Number of curves (default: 5)
    --parameters <N>    Parameters per curve (default: 10)
    --currencies <LIST> Comma-separated currency codes (default: USD)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    risk-sensitivities convert --input sens.json --currency USD
    risk-sensitivities total --input sens.json --format json
    risk-sensitivities pv01 --input sens.json --currency GBP
    risk-sensitivities payment --direction receive --amount 100 --currency USD --date 2024-01-06
    risk-sensitivities generate --curves 3 --currencies USD,GBP --output sens.json"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// JSON schema for an FX quote: 1 `from` = `rate` `to`.
#[derive(serde::Deserialize, serde::Serialize)]
struct RateInput {
    from: String,
    to: String,
    rate: String,
}

/// JSON schema for one sensitivity entry.
#[derive(serde::Deserialize, serde::Serialize)]
struct SensitivityInput {
    name: String,
    #[serde(default)]
    kind: MarketDataKind,
    currency: String,
    values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Vec<ParameterMetadata>>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct InputFile {
    #[serde(default = "default_currency")]
    base_currency: String,
    #[serde(default)]
    rates: Vec<RateInput>,
    sensitivities: Vec<SensitivityInput>,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn parse_options(args: &[String], allowed: &[&str]) -> HashMap<String, String> {
    let mut options = HashMap::new();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !allowed.contains(&flag) {
            fail(format!("unknown option: {}", flag));
        }
        i += 1;
        let value = args
            .get(i)
            .cloned()
            .unwrap_or_else(|| fail(format!("{} requires a value", flag)));
        options.insert(flag.trim_start_matches("--").to_string(), value);
        i += 1;
    }
    options
}

fn required<'a>(options: &'a HashMap<String, String>, name: &str) -> &'a str {
    options
        .get(name)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("--{} is required", name)))
}

fn load_input(path: &str) -> (FxRateTable, CurrencyParameterSensitivities) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)));

    let file: InputFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "base_currency": "USD",
  "rates": [ {{ "from": "GBP", "to": "USD", "rate": "1.5" }} ],
  "sensitivities": [
    {{ "name": "GBP-Discount", "currency": "GBP", "values": [1.0, 2.0] }}
  ]
}}"#
        );
        fail(format!("parsing JSON: {}", e))
    });

    let mut rates = FxRateTable::new(CurrencyCode::new(&file.base_currency));
    for quote in &file.rates {
        let rate = quote
            .rate
            .parse::<Decimal>()
            .unwrap_or_else(|e| fail(format!("invalid rate '{}': {}", quote.rate, e)));
        rates
            .set_rate(CurrencyCode::new(&quote.from), CurrencyCode::new(&quote.to), rate)
            .unwrap_or_else(|e| fail(e));
    }

    let mut entries = Vec::with_capacity(file.sensitivities.len());
    for input in file.sensitivities {
        let name = MarketDataName::new(input.kind, &input.name);
        let currency = CurrencyCode::new(&input.currency);
        let entry = match input.metadata {
            Some(metadata) => CurrencyParameterSensitivity::of(name, metadata, currency, input.values)
                .unwrap_or_else(|e| fail(format!("sensitivity '{}': {}", input.name, e))),
            None => CurrencyParameterSensitivity::of_empty_metadata(name, currency, input.values),
        };
        entries.push(entry);
    }
    let sensitivities = CurrencyParameterSensitivities::of(entries).unwrap_or_else(|e| fail(e));
    debug!(
        "loaded {} sensitivities and {} FX quotes from {}",
        sensitivities.len(),
        file.rates.len(),
        path
    );
    (rates, sensitivities)
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(format!("writing JSON: {}", e)))
}

fn cmd_convert(args: &[String]) {
    let options = parse_options(args, &["--input", "--currency", "--format"]);
    let (rates, sensitivities) = load_input(required(&options, "input"));
    let currency = CurrencyCode::new(required(&options, "currency"));

    let converted = sensitivities
        .converted_to(&currency, &rates)
        .unwrap_or_else(|e| fail(e));

    match options.get("format").map(String::as_str) {
        Some("json") => println!("{}", to_json(&converted)),
        Some("text") | None => print!("{}", converted),
        Some(other) => fail(format!("unknown format '{}'", other)),
    }
}

fn cmd_total(args: &[String]) {
    let options = parse_options(args, &["--input", "--format"]);
    let (_, sensitivities) = load_input(required(&options, "input"));
    let total = sensitivities.total();

    match options.get("format").map(String::as_str) {
        Some("json") => println!("{}", to_json(&total)),
        Some("text") | None => {
            println!("=== Totals ===");
            for amount in total.iter() {
                println!("  {}", amount);
            }
        }
        Some(other) => fail(format!("unknown format '{}'", other)),
    }
}

fn cmd_pv01(args: &[String]) {
    let options = parse_options(args, &["--input", "--currency"]);
    let (rates, sensitivities) = load_input(required(&options, "input"));

    println!("=== PV01 ===");
    for amount in pv01(&sensitivities).iter() {
        println!("  {}", amount);
    }
    if let Some(code) = options.get("currency") {
        let currency = CurrencyCode::new(code);
        let total = pv01_in(&sensitivities, &currency, &rates).unwrap_or_else(|e| fail(e));
        println!("  Total:  {}", total);
    }
    println!();
    print!("{}", bucketed_pv01(&sensitivities));
}

fn cmd_payment(args: &[String]) {
    let options = parse_options(
        args,
        &["--direction", "--amount", "--currency", "--date", "--convention"],
    );
    let direction = required(&options, "direction")
        .parse::<PayReceive>()
        .unwrap_or_else(|e| fail(e));
    let amount = required(&options, "amount")
        .parse::<f64>()
        .unwrap_or_else(|e| fail(format!("invalid amount: {}", e)));
    let currency = CurrencyCode::new(required(&options, "currency"));
    let date = NaiveDate::parse_from_str(required(&options, "date"), "%Y-%m-%d")
        .unwrap_or_else(|e| fail(format!("invalid date: {}", e)));
    let convention = options
        .get("convention")
        .map(|c| c.parse::<BusinessDayConvention>().unwrap_or_else(|e| fail(e)))
        .unwrap_or(BusinessDayConvention::Following);

    let adjustable = AdjustableDate::new(
        date,
        BusinessDayAdjustment::new(convention, HolidayCalendar::weekends()),
    );
    let bullet = BulletPayment::new(direction, CurrencyAmount::new(currency, amount), adjustable)
        .unwrap_or_else(|e| fail(e));
    let payment = bullet.expand_to_payment().unwrap_or_else(|e| fail(e));

    println!("Bullet payment: {}", bullet);
    println!("Payment:        {}", payment);
}

fn cmd_generate(args: &[String]) {
    let options = parse_options(
        args,
        &["--curves", "--parameters", "--currencies", "--output"],
    );
    let mut config = SensitivityConfig::default();
    if let Some(n) = options.get("curves") {
        config.curve_count = n
            .parse()
            .unwrap_or_else(|_| fail("--curves requires a number"));
    }
    if let Some(n) = options.get("parameters") {
        config.parameter_count = n
            .parse()
            .unwrap_or_else(|_| fail("--parameters requires a number"));
    }
    if let Some(list) = options.get("currencies") {
        config.currencies = list.split(',').map(|s| CurrencyCode::new(s.trim())).collect();
    }

    let set = generate_random_sensitivities(&config).unwrap_or_else(|e| fail(e));

    let output = InputFile {
        base_currency: config
            .currencies
            .first()
            .map(|c| c.to_string())
            .unwrap_or_else(default_currency),
        rates: Vec::new(),
        sensitivities: set
            .iter()
            .map(|s| SensitivityInput {
                name: s.market_data_name().to_string(),
                kind: s.market_data_name().kind(),
                currency: s.currency().to_string(),
                values: s.sensitivity().to_vec(),
                metadata: Some(s.parameter_metadata().to_vec()),
            })
            .collect(),
    };

    let json = to_json(&output);

    if let Some(path) = options.get("output") {
        fs::write(path, &json).unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} sensitivities across {} curves → {}",
            set.len(),
            config.curve_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "convert" => cmd_convert(rest),
        "total" => cmd_total(rest),
        "pv01" => cmd_pv01(rest),
        "payment" => cmd_payment(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
