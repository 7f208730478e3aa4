//! Benchmarks for token issuance and validation hot paths

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quill_auth_core::{SigningKey, TokenIssuer, TokenValidator};
use quill_types::UserId;

fn pair() -> (TokenIssuer, TokenValidator) {
    let key = SigningKey::new("bench-signing-secret-".repeat(3)).unwrap();
    (TokenIssuer::new(key.clone(), 24).unwrap(), TokenValidator::new(key))
}

fn bench_issue(c: &mut Criterion) {
    let (issuer, _) = pair();
    let long = "x".repeat(100);
    let names = ["bob", "a_reasonably_long_username", long.as_str()];

    let mut group = c.benchmark_group("token_issue");

    for name in names {
        group.bench_with_input(BenchmarkId::from_parameter(name.len()), name, |b, name| {
            b.iter(|| issuer.issue(black_box(UserId(42)), black_box(name)));
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let (issuer, validator) = pair();
    let token = issuer.issue(UserId(42), "alice").unwrap();
    let now = Utc::now();

    let mut group = c.benchmark_group("token_validate");

    group.bench_function("valid", |b| {
        b.iter(|| validator.validate_at(black_box(&token), now));
    });

    let mut tampered = token.clone();
    tampered.pop();
    tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
    group.bench_function("bad_signature", |b| {
        b.iter(|| validator.validate_at(black_box(&tampered), now));
    });

    group.bench_function("malformed", |b| {
        b.iter(|| validator.validate_at(black_box("not.a.token"), now));
    });

    group.finish();
}

criterion_group!(benches, bench_issue, bench_validate);
criterion_main!(benches);
