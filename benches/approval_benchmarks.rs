//! Performance benchmarks for the payroll approval engine.
//!
//! Measures the cost of the core state-machine transitions against the
//! in-memory store, both directly and through the HTTP router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::engine::{ApprovalEngine, NewEmployee, NewPayroll};
use payroll_engine::models::Role;
use payroll_engine::notify::TracingDelivery;
use payroll_engine::store::PayrollStore;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

struct BenchContext {
    engine: Arc<ApprovalEngine>,
    hr_id: u64,
    director_id: u64,
    employee_id: u64,
    periods: AtomicU32,
}

impl BenchContext {
    /// Hands out a fresh (month, year) per call so periods never collide.
    fn next_period(&self) -> (u32, i32) {
        let n = self.periods.fetch_add(1, Ordering::Relaxed);
        (n % 12 + 1, 2000 + (n / 12) as i32)
    }
}

/// Engine with one company holding an effectively unlimited balance.
fn create_bench_context(rt: &tokio::runtime::Runtime) -> BenchContext {
    rt.block_on(async {
        let store = Arc::new(PayrollStore::new());
        let engine = Arc::new(ApprovalEngine::new(store, Arc::new(TracingDelivery)));

        let hr = engine.create_user("hr", Some(Role::Hr)).await.unwrap();
        let director = engine
            .create_user("director", Some(Role::Director))
            .await
            .unwrap();
        let company = engine
            .create_company("BenchCorp", Decimal::from(1_000_000_000u64))
            .await
            .unwrap();
        let employee = engine
            .create_employee(NewEmployee {
                user_id: hr.id,
                company_id: company.id,
                full_name: "Bench Employee".to_string(),
                phone: String::new(),
                job_role: "Benchmarking".to_string(),
                base_salary: Decimal::from(1000),
            })
            .await
            .unwrap();

        BenchContext {
            engine,
            hr_id: hr.id,
            director_id: director.id,
            employee_id: employee.id,
            periods: AtomicU32::new(0),
        }
    })
}

async fn create_pending_payroll(ctx: &BenchContext) -> u64 {
    let (month, year) = ctx.next_period();
    ctx.engine
        .create_payroll(NewPayroll {
            employee_id: ctx.employee_id,
            month,
            year,
            attendance_days: 22,
            bonus: Decimal::ZERO,
            deductions: Decimal::ZERO,
            payment_date: None,
            created_by: ctx.hr_id,
        })
        .await
        .unwrap()
        .id
}

/// Benchmark: a single approve transition, including the ledger debit.
fn bench_single_approval(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = create_bench_context(&rt);

    c.bench_function("single_approval", |b| {
        b.to_async(&rt).iter(|| async {
            let payroll_id = create_pending_payroll(&ctx).await;
            let outcome = ctx
                .engine
                .approve(payroll_id, ctx.director_id)
                .await
                .unwrap();
            black_box(outcome)
        })
    });
}

/// Benchmark: full lifecycle, create then approve then settle.
fn bench_full_lifecycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = create_bench_context(&rt);

    c.bench_function("full_lifecycle", |b| {
        b.to_async(&rt).iter(|| async {
            let payroll_id = create_pending_payroll(&ctx).await;
            ctx.engine
                .approve(payroll_id, ctx.director_id)
                .await
                .unwrap();
            let outcome = ctx.engine.mark_paid(payroll_id).await.unwrap();
            black_box(outcome)
        })
    });
}

/// Benchmark: batch approval of 100 pending payrolls.
fn bench_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = create_bench_context(&rt);

    let mut group = c.benchmark_group("batch_approval");
    group.throughput(Throughput::Elements(100));
    group.sample_size(10);

    group.bench_function("batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            let mut ids = Vec::with_capacity(100);
            for _ in 0..100 {
                ids.push(create_pending_payroll(&ctx).await);
            }
            let report = ctx
                .engine
                .batch_approve(&ids, ctx.director_id)
                .await
                .unwrap();
            black_box(report)
        })
    });

    group.finish();
}

/// Benchmark: the approve endpoint through the HTTP router.
fn bench_http_approval(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = create_bench_context(&rt);
    let router = create_router(AppState::new(ctx.engine.clone()));

    c.bench_function("http_approval", |b| {
        b.to_async(&rt).iter(|| async {
            let payroll_id = create_pending_payroll(&ctx).await;
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/payrolls/{payroll_id}/approve"))
                        .header("x-user-id", ctx.director_id.to_string())
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_single_approval,
    bench_full_lifecycle,
    bench_batch_100,
    bench_http_approval,
);
criterion_main!(benches);
