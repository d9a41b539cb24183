use storefront_core::OfflineCatalogSource;

use super::*;

async fn loaded_shell() -> Shell {
    let store = Storefront::new(Arc::new(OfflineCatalogSource));
    store.fetch_catalog().await;
    Shell::new(store)
}

async fn run_script(shell: &mut Shell, script: &str) -> String {
    let mut out = Vec::new();
    shell
        .run(script.as_bytes(), &mut out)
        .await
        .expect("run script");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn parses_commands_and_aliases() {
    assert_eq!(ShellCommand::parse("ls").expect("ls"), ShellCommand::List);
    assert_eq!(
        ShellCommand::parse("  add 7 ").expect("add"),
        ShellCommand::Add(ProductId(7))
    );
    assert_eq!(
        ShellCommand::parse("- 3").expect("dec"),
        ShellCommand::Decrease(ProductId(3))
    );
    assert_eq!(
        ShellCommand::parse("search gold ring").expect("search"),
        ShellCommand::Search("gold ring".into())
    );
    assert_eq!(
        ShellCommand::parse("category men's clothing").expect("category"),
        ShellCommand::Category("men's clothing".into())
    );
    assert_eq!(
        ShellCommand::parse("sort desc").expect("sort"),
        ShellCommand::Sort(Some(SortOrder::Descending))
    );
    assert_eq!(ShellCommand::parse("sort").expect("sort"), ShellCommand::Sort(None));
    assert_eq!(ShellCommand::parse("EXIT").expect("exit"), ShellCommand::Quit);
}

#[test]
fn rejects_bad_input() {
    assert!(ShellCommand::parse("add").is_err());
    assert!(ShellCommand::parse("add seven").is_err());
    assert!(ShellCommand::parse("sort upward").is_err());
    assert!(ShellCommand::parse("category").is_err());
    assert!(ShellCommand::parse("checkout").is_err());
}

#[tokio::test]
async fn offline_refresh_reports_bundled_catalog() {
    let store = Storefront::new(Arc::new(OfflineCatalogSource));
    let mut shell = Shell::new(Arc::clone(&store));

    let output = run_script(&mut shell, "refresh\nstatus\n").await;

    assert_eq!(
        output.matches("notice: catalog unavailable").count(),
        1,
        "{output}"
    );
    assert!(output.contains("showing bundled products"), "{output}");
    assert!(output.contains("catalog: Succeeded, 10 product(s), bundled"), "{output}");
}

#[tokio::test]
async fn fallback_caused_elsewhere_is_announced_on_next_command() {
    let store = Storefront::new(Arc::new(OfflineCatalogSource));
    let mut shell = Shell::new(Arc::clone(&store));
    let mut out = Vec::new();

    store.fetch_catalog().await;
    shell
        .execute(ShellCommand::Cart, &mut out)
        .await
        .expect("cart");

    let output = String::from_utf8(out).expect("utf8");
    assert!(output.contains("cart is empty"), "{output}");
    assert!(
        output.contains("notice: catalog unavailable (catalog source unavailable: offline mode)"),
        "{output}"
    );

    let mut out = Vec::new();
    shell
        .execute(ShellCommand::Cart, &mut out)
        .await
        .expect("cart");
    assert!(!String::from_utf8(out).expect("utf8").contains("notice:"));
}

#[test]
fn startup_report_stays_off_stdout_for_one_shot_commands() {
    let outcome = FetchOutcome::Fallback {
        reason: "timed out".into(),
    };

    let (mut out, mut diagnostics) = (Vec::new(), Vec::new());
    report_startup_outcome(&outcome, false, &mut out, &mut diagnostics).expect("report");
    assert!(out.is_empty());
    assert!(String::from_utf8(diagnostics)
        .expect("utf8")
        .contains("catalog unavailable (timed out)"));

    let (mut out, mut diagnostics) = (Vec::new(), Vec::new());
    report_startup_outcome(&FetchOutcome::Live { count: 3 }, true, &mut out, &mut diagnostics)
        .expect("report");
    assert_eq!(String::from_utf8(out).expect("utf8"), "loaded 3 product(s)\n");
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn cart_session_updates_totals() {
    let mut shell = loaded_shell().await;

    let output = run_script(&mut shell, "add 2\nadd 2\nadd 7\ndec 7\ncart\nquit\nadd 1\n").await;

    assert!(output.contains("cart: 1 item(s), $22.30"), "{output}");
    assert!(output.contains("cart: 2 item(s), $44.60"), "{output}");
    assert!(output.contains("[2] Mens Casual Premium Slim Fit T-Shirts | 2 x $22.30 = $44.60"));
    assert!(output.contains("total: 2 item(s), $44.60"), "{output}");
    assert!(!output.contains("$154.55"), "quit must stop the session: {output}");
}

#[tokio::test]
async fn view_filters_combine() {
    let mut shell = loaded_shell().await;
    let mut out = Vec::new();

    shell
        .execute(ShellCommand::Category("electronics".into()), &mut out)
        .await
        .expect("category");
    out.clear();
    shell
        .execute(ShellCommand::Sort(Some(SortOrder::Ascending)), &mut out)
        .await
        .expect("sort");

    let listing = String::from_utf8(out).expect("utf8");
    let ids: Vec<&str> = listing
        .lines()
        .filter_map(|line| line.split(']').next())
        .collect();
    assert_eq!(ids, vec!["[9", "[10"]);
}

#[tokio::test]
async fn listing_marks_items_already_in_cart() {
    let mut shell = loaded_shell().await;
    let mut out = Vec::new();
    shell
        .execute(ShellCommand::Add(ProductId(9)), &mut out)
        .await
        .expect("add");
    out.clear();

    shell
        .execute(ShellCommand::Search("hard drive".into()), &mut out)
        .await
        .expect("search");

    let listing = String::from_utf8(out).expect("utf8");
    assert_eq!(listing.lines().count(), 1);
    assert!(listing.contains("| in cart: 1"), "{listing}");
}

#[tokio::test]
async fn unknown_ids_are_reported_not_fatal() {
    let mut shell = loaded_shell().await;

    let output = run_script(&mut shell, "add 404\nshow 404\nremove 404\nbogus\n").await;

    assert!(output.contains("no product with id 404"), "{output}");
    assert!(output.contains("cart is empty"), "{output}");
    assert!(output.contains("unknown command 'bogus'"), "{output}");
}
