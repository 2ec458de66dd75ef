//! Demo data loaded by `--seed`.
//!
//! The bundled catalog carries prices as JSON floats. Every license goes
//! through the record mapper, so `29.99` is stored as exactly `29.99`.

use std::collections::HashSet;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

use lapsus_auth::AuthError;
use lapsus_core::catalog::License;
use lapsus_core::identity::CreateUserRequest;
use lapsus_core::record::{FieldValue, RecordMapping};
use lapsus_core::storage::{PageRequest, RepositoryError, MAX_PAGE_SIZE};
use rust_decimal::Decimal;

use crate::state::AppState;

const CATALOG: &str = include_str!("../seed/catalog.json");

#[derive(Debug, Deserialize)]
struct Catalog {
    licenses: Vec<serde_json::Map<String, Value>>,
    users: Vec<CreateUserRequest>,
}

/// What a seed run added.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub licenses_created: usize,
    pub licenses_skipped: usize,
    pub users_created: usize,
    pub users_skipped: usize,
}

/// Build a license from a catalog entry. Only updatable attributes are
/// taken from the entry; the ID and timestamps are fresh. `product_name` and
/// `price` are required.
fn license_from_entry(entry: &serde_json::Map<String, Value>) -> anyhow::Result<License> {
    for field in ["product_name", "price"] {
        anyhow::ensure!(
            entry.get(field).is_some_and(|value| !value.is_null()),
            "catalog entry is missing {field}: {entry:?}"
        );
    }

    let mut record = License::new("", Decimal::ZERO).to_record();
    for (field, value) in entry {
        if License::UPDATABLE.contains(&field.as_str()) {
            record.insert(field.clone(), FieldValue::from_json(value)?);
        }
    }
    let license = License::from_record(&record)
        .with_context(|| format!("invalid catalog entry: {entry:?}"))?;
    lapsus_core::catalog::validate_product_name(&license.product_name)?;
    lapsus_core::catalog::validate_price(license.price)?;
    Ok(license)
}

/// Names of every license already in the catalog.
async fn existing_product_names(state: &AppState) -> anyhow::Result<HashSet<String>> {
    let mut names = HashSet::new();
    let mut request = PageRequest::first(MAX_PAGE_SIZE);
    loop {
        let page = state.licenses.list_licenses(&request).await?;
        names.extend(page.items.into_iter().map(|license| license.product_name));
        match page.next_cursor {
            Some(cursor) => request = PageRequest::first(MAX_PAGE_SIZE).after(cursor),
            None => return Ok(names),
        }
    }
}

/// Load the demo licenses and accounts, skipping any that already exist.
pub async fn seed(state: &AppState) -> anyhow::Result<SeedReport> {
    let catalog: Catalog = serde_json::from_str(CATALOG).context("invalid bundled catalog")?;
    let mut report = SeedReport::default();

    let existing = existing_product_names(state).await?;
    for entry in &catalog.licenses {
        let license = license_from_entry(entry)?;
        if existing.contains(&license.product_name) {
            tracing::debug!(product_name = %license.product_name, "License exists, skipping");
            report.licenses_skipped += 1;
            continue;
        }
        state.licenses.create_license(&license).await?;
        report.licenses_created += 1;
    }

    for request in catalog.users {
        let username = request.username.clone();
        match state.auth.accounts.register(request).await {
            Ok(_) => report.users_created += 1,
            Err(AuthError::Repository(RepositoryError::Conflict(reason))) => {
                tracing::debug!(%username, %reason, "Account exists, skipping");
                report.users_skipped += 1;
            }
            Err(error) => return Err(error.into()),
        }
    }

    tracing::info!(
        licenses_created = report.licenses_created,
        licenses_skipped = report.licenses_skipped,
        users_created = report.users_created,
        users_skipped = report.users_skipped,
        "Seeded demo data"
    );
    Ok(report)
}
