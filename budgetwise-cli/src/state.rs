//! File-backed state under ~/.budgetwise (or $BUDGETWISE_HOME).

use anyhow::{bail, Context, Result};
use budgetwise_core::{Allocations, Profile, SavingsGoal};
use budgetwise_ledger::ActivityLog;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "BUDGETWISE_HOME";

pub fn budgetwise_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".budgetwise"))
}

pub fn ensure_budgetwise_home() -> Result<PathBuf> {
    let dir = budgetwise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// The onboarding answers plus the engine profile built from them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub created_at_utc: Option<String>,
    pub name: String,
    pub user_type: String,
    /// Symbol shown next to amounts, e.g. "₹"
    pub currency_symbol: String,
    pub budget: Profile,
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_budgetwise_home()?.join("profile.json"))
}

pub fn budget_path() -> Result<PathBuf> {
    Ok(ensure_budgetwise_home()?.join("budget.json"))
}

pub fn goal_path() -> Result<PathBuf> {
    Ok(ensure_budgetwise_home()?.join("goal.json"))
}

pub fn activity_path() -> Result<PathBuf> {
    Ok(ensure_budgetwise_home()?.join("activity.json"))
}

pub fn expenses_path() -> Result<PathBuf> {
    Ok(ensure_budgetwise_home()?.join("expenses.csv"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_profile() -> Result<Option<UserProfile>> {
    read_json(&profile_path()?)
}

/// Like [`read_profile`] but a missing profile is an error
pub fn require_profile() -> Result<UserProfile> {
    match read_profile()? {
        Some(p) => Ok(p),
        None => bail!("No profile found at {}. Run: budgetwise setup", profile_path()?.display()),
    }
}

pub fn write_profile(profile: &UserProfile) -> Result<()> {
    write_json(&profile_path()?, profile)
}

pub fn read_budget() -> Result<Option<Allocations>> {
    read_json(&budget_path()?)
}

pub fn write_budget(allocations: &Allocations) -> Result<()> {
    write_json(&budget_path()?, allocations)
}

pub fn read_goal() -> Result<Option<SavingsGoal>> {
    read_json(&goal_path()?)
}

pub fn write_goal(goal: &SavingsGoal) -> Result<()> {
    write_json(&goal_path()?, goal)
}

/// Returns false when there was no goal to remove
pub fn remove_goal() -> Result<bool> {
    let p = goal_path()?;
    if !p.exists() {
        return Ok(false);
    }
    fs::remove_file(&p).with_context(|| format!("remove {}", p.display()))?;
    Ok(true)
}

pub fn read_activity() -> Result<ActivityLog> {
    Ok(read_json(&activity_path()?)?.unwrap_or_default())
}

pub fn write_activity(log: &ActivityLog) -> Result<()> {
    write_json(&activity_path()?, log)
}
