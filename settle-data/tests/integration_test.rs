//! End-to-end settlement tests against the real SQLite backend.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use settle_core::{
    NewMonthlySettlement, PaymentRecord, PtType, SettlementRepository, Staff, StaffRole,
    TrainerMonthKey,
};
use settle_data::{BonusRuleLoader, CommissionRateLoader, SettlementRunner};
use settle_db_sqlite::SqliteRepository;
use sqlx::sqlite::SqlitePoolOptions;

const RATES_CSV: &str = include_str!("test-data/commission_rates.csv");
const RULES_CSV: &str = include_str!("test-data/bonus_rules.csv");

async fn setup_test_db() -> SqliteRepository {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    let repo = SqliteRepository::new_with_pool(pool);
    repo.run_migrations()
        .await
        .expect("Failed to run migrations");

    repo
}

async fn load_policies(repo: &SqliteRepository) {
    let rates = CommissionRateLoader::parse(RATES_CSV.as_bytes()).expect("Should parse rates");
    CommissionRateLoader::load(repo, &rates)
        .await
        .expect("Should load rates");

    let rules = BonusRuleLoader::parse(RULES_CSV.as_bytes()).expect("Should parse rules");
    BonusRuleLoader::load(repo, &rules)
        .await
        .expect("Should load rules");
}

async fn seed_payment(
    repo: &SqliteRepository,
    trainer_id: i64,
    member: &str,
    amount: Decimal,
    date: &str,
) {
    repo.insert_payment(
        trainer_id,
        &PaymentRecord {
            member_name: member.to_string(),
            pt_type: PtType::Regular,
            payment_amount: amount,
            payment_date: date.parse().unwrap(),
        },
    )
    .await
    .expect("Should insert payment");
}

/// Seed a June 2025 scenario for a team leader:
/// - base salary 700,000
/// - own payments 4,500,000; carryover 120,000 → bracket one (21,000/session)
/// - 10 regular + 2 free sessions → session revenue 230,000
/// - teammate payments 2,000,000 → team PT incentive 100,000
/// - one payment over 500,000 on a single day → daily bonus 50,000
async fn seed_team_leader_june(repo: &SqliteRepository) {
    load_policies(repo).await;

    repo.upsert_staff(&Staff {
        id: 1,
        name: "Leader Kang".to_string(),
        role: StaffRole::TeamLeader,
        center_id: 1,
        team_id: Some(10),
    })
    .await
    .unwrap();
    repo.upsert_staff(&Staff {
        id: 2,
        name: "Trainer Han".to_string(),
        role: StaffRole::Trainer,
        center_id: 1,
        team_id: Some(10),
    })
    .await
    .unwrap();

    repo.set_base_salary(1, dec!(700000)).await.unwrap();

    seed_payment(repo, 1, "Kim Minsu", dec!(3000000), "2025-06-02").await;
    seed_payment(repo, 1, "Lee Jia", dec!(1500000), "2025-06-10").await;
    seed_payment(repo, 2, "Park Dohyun", dec!(2000000), "2025-06-05").await;

    for day in 1..=10 {
        repo.record_pt_session(
            1,
            chrono::NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            PtType::Regular,
        )
        .await
        .unwrap();
    }
    for day in 11..=12 {
        repo.record_pt_session(
            1,
            chrono::NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            PtType::Free,
        )
        .await
        .unwrap();
    }

    // Previous month's snapshot carries 120,000 into June.
    repo.create_settlement(NewMonthlySettlement {
        trainer_id: 1,
        center_id: 1,
        settlement_year: 2025,
        settlement_month: 5,
        actual_revenue: dec!(4000000),
        carryover_from_prev: dec!(120000),
        total_revenue: dec!(4120000),
        session_revenue: dec!(0),
        team_pt_incentive: dec!(0),
        base_salary: dec!(700000),
        gross_salary: dec!(700000),
        withholding_tax: dec!(23100),
        net_salary: dec!(676900),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn settles_a_team_leader_month_end_to_end() {
    let repo = setup_test_db().await;
    seed_team_leader_june(&repo).await;

    let key = TrainerMonthKey::new(1, 2025, 6).unwrap();
    let runner = SettlementRunner::new(&repo);
    let result = runner.settle(&key, "").await.expect("Should settle");

    assert_eq!(result.total_revenue, dec!(4500000));
    assert_eq!(result.carryover_amount, dec!(120000));
    assert_eq!(result.total_revenue_with_carryover, dec!(4620000));
    // 10 regular × 21,000 + 2 free × 10,000
    assert_eq!(result.session_revenue, dec!(230000));
    // Team total 6,500,000 minus the leader's own 4,500,000
    assert_eq!(result.team_pt_revenue, dec!(2000000));
    assert_eq!(result.team_pt_incentive, dec!(100000));
    // 700,000 base + 230,000 sessions + 50,000 bonus + 0 monthly + 100,000 incentive
    assert_eq!(result.gross_salary, dec!(1080000));
    assert_eq!(result.withholding_tax, dec!(35640));
    assert_eq!(result.net_salary, dec!(1044360));
}

#[tokio::test]
async fn member_filter_narrows_the_revenue_figure() {
    let repo = setup_test_db().await;
    seed_team_leader_june(&repo).await;

    let key = TrainerMonthKey::new(1, 2025, 6).unwrap();
    let runner = SettlementRunner::new(&repo);
    let result = runner.settle(&key, "kim").await.expect("Should settle");

    assert_eq!(result.total_revenue, dec!(3000000));
    assert_eq!(result.total_revenue_with_carryover, dec!(3120000));
    // Session counts and team figures are untouched by the filter.
    assert_eq!(result.session_revenue, dec!(230000));
    assert_eq!(result.team_pt_incentive, dec!(100000));
}

#[tokio::test]
async fn save_persists_a_matching_snapshot() {
    let repo = setup_test_db().await;
    seed_team_leader_june(&repo).await;

    let key = TrainerMonthKey::new(1, 2025, 6).unwrap();
    let runner = SettlementRunner::new(&repo);
    let (result, saved) = runner
        .settle_and_save(&key, "")
        .await
        .expect("Should settle and save");

    assert_eq!(saved.settlement_year, 2025);
    assert_eq!(saved.settlement_month, 6);
    assert_eq!(saved.actual_revenue, result.total_revenue);
    assert_eq!(saved.carryover_from_prev, dec!(120000));
    assert_eq!(saved.total_revenue, result.total_revenue_with_carryover);
    assert_eq!(saved.base_salary, dec!(700000));
    assert_eq!(saved.net_salary, result.net_salary);

    let fetched = repo.get_settlement(&key).await.expect("Should fetch");
    assert_eq!(fetched, saved);
}

#[tokio::test]
async fn settles_with_no_recorded_facts_at_all() {
    let repo = setup_test_db().await;
    repo.upsert_staff(&Staff {
        id: 5,
        name: "Trainer Seo".to_string(),
        role: StaffRole::Trainer,
        center_id: 1,
        team_id: None,
    })
    .await
    .unwrap();

    let key = TrainerMonthKey::new(5, 2025, 6).unwrap();
    let runner = SettlementRunner::new(&repo);
    let result = runner.settle(&key, "").await.expect("Should settle");

    assert_eq!(result.gross_salary, dec!(0));
    assert_eq!(result.withholding_tax, dec!(0));
    assert_eq!(result.net_salary, dec!(0));
}

#[tokio::test]
async fn plain_trainer_earns_no_team_incentive() {
    let repo = setup_test_db().await;
    seed_team_leader_june(&repo).await;

    let key = TrainerMonthKey::new(2, 2025, 6).unwrap();
    let runner = SettlementRunner::new(&repo);
    let result = runner.settle(&key, "").await.expect("Should settle");

    assert_eq!(result.total_revenue, dec!(2000000));
    assert_eq!(result.team_pt_revenue, dec!(0));
    assert_eq!(result.team_pt_incentive, dec!(0));
}

#[tokio::test]
async fn reloading_policies_replaces_rather_than_appends() {
    let repo = setup_test_db().await;
    load_policies(&repo).await;
    load_policies(&repo).await;

    assert_eq!(repo.get_commission_rates().await.unwrap().len(), 3);
    assert_eq!(repo.get_bonus_rules().await.unwrap().len(), 1);
}
