//! Funder/user input files and the merge that turns them into the ordered
//! entry sequence the packer consumes.

use crate::error::DatasetError;
use rand::Rng;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fs, path::Path};

/// A funder row, stored on disk as `[name, amount]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)", into = "(String, f64)")]
pub struct Funder {
    pub name: String,
    pub amount: f64,
}

impl From<(String, f64)> for Funder {
    fn from((name, amount): (String, f64)) -> Self {
        Self { name, amount }
    }
}

impl From<Funder> for (String, f64) {
    fn from(f: Funder) -> Self {
        (f.name, f.amount)
    }
}

type UserRow = (String, f64, Option<String>, Option<String>);

/// A user row, stored on disk as `[name, amount, target, description]`.
///
/// `amount` is the positive amount consumed; the merge negates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserRow", into = "UserRow")]
pub struct User {
    pub name: String,
    pub amount: f64,
    pub target: Option<String>,
    pub description: Option<String>,
}

impl From<UserRow> for User {
    fn from((name, amount, target, description): UserRow) -> Self {
        Self {
            name,
            amount,
            target,
            description,
        }
    }
}

impl From<User> for UserRow {
    fn from(u: User) -> Self {
        (u.name, u.amount, u.target, u.description)
    }
}

/// One packed item. Positive amounts are funders, the rest users.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub amount: f64,
    pub target: Option<String>,
    pub description: Option<String>,
}

impl Entry {
    pub fn is_funder(&self) -> bool {
        self.amount > 0.0
    }
}

impl From<&Funder> for Entry {
    fn from(f: &Funder) -> Self {
        Self {
            name: f.name.clone(),
            amount: f.amount,
            target: None,
            description: None,
        }
    }
}

impl From<&User> for Entry {
    fn from(u: &User) -> Self {
        Self {
            name: u.name.clone(),
            amount: -u.amount,
            target: u.target.clone(),
            description: u.description.clone(),
        }
    }
}

/// Interleaves funders and users into one chronological sequence.
///
/// Funders are taken in order, each adding its amount to a running balance.
/// After every funder, users are consumed in order for as long as the next
/// one fits in the balance. Merging stops once the last user is consumed or
/// the funders run out. Entries with `|amount| < noise_floor` are dropped
/// afterwards.
pub fn merge(funders: &[Funder], users: &[User], noise_floor: f64) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(funders.len() + users.len());
    let mut balance = 0.0;
    let mut pending = users.iter().peekable();

    for funder in funders {
        entries.push(Entry::from(funder));
        balance += funder.amount;

        while let Some(user) = pending.next_if(|u| u.amount <= balance) {
            balance -= user.amount;
            entries.push(Entry::from(user));
        }

        if pending.peek().is_none() {
            break;
        }
    }

    let unmatched = pending.count();
    if unmatched > 0 {
        log::info!("{unmatched} users left unfunded (balance {balance})");
    }

    let merged = entries.len();
    entries.retain(|e| e.amount.abs() >= noise_floor);
    log::debug!(
        "merged {merged} entries, {} dropped below noise floor",
        merged - entries.len()
    );
    entries
}

pub fn read_funders(path: &Path) -> Result<Vec<Funder>, DatasetError> {
    read_json(path)
}

pub fn read_users(path: &Path) -> Result<Vec<User>, DatasetError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DatasetError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Random funder and user lists for demos.
///
/// Funders give between 10 and 500, users take between 1 and 100, both
/// rounded to cents. Each user targets one of four made-up projects.
pub fn synthetic(funders: usize, users: usize, rng: &mut impl Rng) -> (Vec<Funder>, Vec<User>) {
    let cents = |x: f64| (x * 100.0).round() / 100.0;

    let funder_list = (0..funders)
        .map(|i| Funder {
            name: format!("funder-{i}"),
            amount: cents(rng.random_range(10.0..=500.0)),
        })
        .collect();

    let user_list = (0..users)
        .map(|i| User {
            name: format!("user-{i}"),
            amount: cents(rng.random_range(1.0..=100.0)),
            target: Some(format!("project-{}", rng.random_range(0..4))),
            description: Some(String::new()),
        })
        .collect();

    (funder_list, user_list)
}
