//! End-to-end runs over the embedded sterling market.

use approx::assert_abs_diff_eq;
use std::path::Path;
use swapval::bootstrap::Composition;
use swapval::core::Error;
use swapval::{CollectingReport, ConsoleReport, MarketConfig, RunState, Workflow};

fn embedded() -> MarketConfig {
    MarketConfig::embedded().unwrap()
}

#[test]
fn base_and_shock_scenarios_are_verified() {
    let config = embedded();
    let mut run = Workflow::new(&config);
    let mut report = CollectingReport::new();
    let summary = run.run(&mut report).unwrap();

    assert_eq!(run.state(), RunState::Verified);
    assert_eq!(summary.scenarios, 2);
    assert_eq!(summary.valuations, 2 * 3 * 2);
    assert_eq!(summary.checks.len(), 2 * 3);

    let scenarios = report.scenarios();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0].header.name, "base");
    assert_eq!(scenarios[0].header.reference, "5Y swap (S5Y)");
    assert_eq!(scenarios[0].header.market_rate, 0.0041);
    assert_eq!(scenarios[1].header.name, "5Y shock");
    assert_eq!(scenarios[1].header.market_rate, 0.0460);
    for scenario in scenarios {
        assert!(scenario.closed);
        assert_eq!(scenario.sections.len(), 2);
        for section in &scenario.sections {
            let labels: Vec<&str> = section.rows.iter().map(|r| r.label.as_str()).collect();
            assert_eq!(labels, ["depo-swap", "depo-fut-swap", "depo-FRA-swap"]);
        }
    }
    assert_eq!(report.rows().count(), 2 * 2 * 3);

    // the check swap reprices to the quote in force
    for (i, check) in summary.checks.iter().enumerate() {
        let quoted = if i < 3 { 0.0041 } else { 0.0460 };
        assert_abs_diff_eq!(check.fair_rate, quoted, epsilon = 1e-8);
    }
}

#[test]
fn five_year_shock_lifts_the_spot_swap() {
    let mut report = CollectingReport::new();
    Workflow::new(&embedded()).run(&mut report).unwrap();
    let [base, shocked] = report.scenarios() else {
        panic!("expected two scenarios");
    };
    for (before, after) in base.sections[0].rows.iter().zip(&shocked.sections[0].rows) {
        assert!(after.fair_rate > before.fair_rate, "{}", before.label);
        assert!(after.npv > before.npv, "{}", before.label);
    }
    // a 4% payer on a sub-1% curve is deep out of the money
    for row in &base.sections[0].rows {
        assert!(row.npv < 0.0 && row.fair_rate < 0.01, "{row:?}");
    }
}

#[test]
fn registries_hold_the_last_curve_built() {
    let config = embedded();
    let mut run = Workflow::new(&config).with_compositions(vec![Composition::DepoFraSwap]);
    run.run(&mut CollectingReport::new()).unwrap();
    let discount = run.discounting().resolve().unwrap();
    let forecast = run.forecasting().resolve().unwrap();
    assert!(std::sync::Arc::ptr_eq(&discount, &forecast));
    assert_eq!(run.quotes().get("S5Y").unwrap(), 0.0460);
}

#[test]
fn missing_fixing_fails_the_spot_swap() {
    let market = swapval::config::EMBEDDED_MARKET;
    let without_fixings = market.split("[[fixing]]").next().unwrap();
    let text = format!(
        "{without_fixings}\n[[scenario]]\nname = \"5Y shock\"\nquote = \"S5Y\"\nvalue = 0.0460\n"
    );
    let config = MarketConfig::from_toml_str(&text, Path::new("no-fixings.toml")).unwrap();
    assert!(config.fixings.is_empty());

    let mut run = Workflow::new(&config);
    let mut report = CollectingReport::new();
    let err = run.run(&mut report).unwrap_err();
    assert!(matches!(err.library_error(), Some(Error::MissingFixing { .. })), "{err}");
    assert!(err.to_string().contains("MissingFixing"), "{err}");
    assert_eq!(run.state(), RunState::Failed);
    assert!(report.scenarios().is_empty());
}

#[test]
fn unknown_scenario_quote_fails_after_the_base_run() {
    let text = format!(
        "{}\n[[scenario]]\nname = \"typo\"\nquote = \"S55Y\"\nvalue = 0.05\n",
        swapval::config::EMBEDDED_MARKET
    );
    let config = MarketConfig::from_toml_str(&text, Path::new("typo.toml")).unwrap();
    let mut run = Workflow::new(&config).with_compositions(vec![Composition::DepoSwap]);
    let mut report = CollectingReport::new();
    let err = run.run(&mut report).unwrap_err();
    assert_eq!(err.library_error(), Some(&Error::KeyNotFound("S55Y".into())));
    assert_eq!(
        err.to_string(),
        "scenario 'typo', quote update: KeyNotFound"
    );
    assert_eq!(run.state(), RunState::Failed);
    // base and the 5Y shock were reported before the failure
    assert_eq!(report.scenarios().len(), 2);
}

#[test]
fn console_output_has_both_tables_per_scenario() {
    let mut report = ConsoleReport::new(Vec::new());
    Workflow::new(&embedded()).run(&mut report).unwrap();
    let text = String::from_utf8(report.into_inner()).unwrap();
    assert_eq!(text.matches("5Y swap (S5Y) market rate = 0.41 %").count(), 1);
    assert_eq!(text.matches("5Y swap (S5Y) market rate = 4.60 %").count(), 1);
    assert_eq!(text.matches("5Y swap paying 4.00 %").count(), 2);
    assert_eq!(text.matches("5Y swap, 1Y forward, paying 4.00 %").count(), 2);
    assert_eq!(text.matches("depo-FRA-swap | ").count(), 4);
}
