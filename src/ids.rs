//! Task id generation.
//!
//! Ids look like `task-7f3k`: a configured prefix plus a short suffix cut
//! from the random section of a fresh ULID. The suffix starts at the
//! configured minimum length and grows only once that length's space is
//! crowded by existing ids.

use std::collections::{HashMap, HashSet};

use ulid::Ulid;

use crate::config::TasksConfig;

const ULID_TIME_LEN: usize = 10;
const ULID_RANDOM_LEN: usize = 16;
const ULID_CHARSET: &str = "0123456789abcdefghjkmnpqrstvwxyz";
const ULID_CHARSET_LEN: u128 = 32;

/// Generate a task id unique against `existing_ids`.
pub fn generate_task_id<'a>(
    config: &TasksConfig,
    existing_ids: impl IntoIterator<Item = &'a str>,
) -> String {
    let prefix = config.id_prefix.trim();

    let mut existing_suffixes = HashSet::new();
    let mut suffix_counts: HashMap<usize, usize> = HashMap::new();
    for id in existing_ids {
        let id_norm = normalize_id(id);
        let suffix = suffix_from_id(&id_norm);
        if suffix.is_empty() {
            continue;
        }
        existing_suffixes.insert(suffix.to_string());
        if is_ulid_suffix(suffix) {
            *suffix_counts.entry(suffix.len()).or_insert(0) += 1;
        }
    }

    let target_len = select_suffix_len(config.id_min_len, &suffix_counts);

    loop {
        let base = Ulid::new().to_string();
        if let Some(suffix) = unique_suffix_from_base(&base, target_len, &existing_suffixes) {
            return format!("{prefix}-{suffix}");
        }
    }
}

fn unique_suffix_from_base(
    base: &str,
    len: usize,
    existing_suffixes: &HashSet<String>,
) -> Option<String> {
    let base = base.to_lowercase();
    let random_end = ULID_TIME_LEN + ULID_RANDOM_LEN;
    if base.len() < random_end || len == 0 || len > ULID_RANDOM_LEN {
        return None;
    }
    let random_part = &base[ULID_TIME_LEN..random_end];
    let candidate = &random_part[..len];
    if existing_suffixes.contains(candidate) {
        return None;
    }
    Some(candidate.to_string())
}

fn select_suffix_len(min_len: usize, suffix_counts: &HashMap<usize, usize>) -> usize {
    let mut len = min_len;
    loop {
        let used = suffix_counts.get(&len).copied().unwrap_or(0) as u128;
        let space = ulid_space_for_len(len);
        if used >= space && len < ULID_RANDOM_LEN {
            len += 1;
            continue;
        }
        return len;
    }
}

fn normalize_id(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

fn suffix_from_id(id_norm: &str) -> &str {
    match id_norm.find('-') {
        Some(idx) if idx + 1 < id_norm.len() => &id_norm[idx + 1..],
        Some(_) => "",
        None => id_norm,
    }
}

fn is_ulid_suffix(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ULID_CHARSET.contains(ch))
}

fn ulid_space_for_len(len: usize) -> u128 {
    let mut space = 1u128;
    for _ in 0..len {
        space *= ULID_CHARSET_LEN;
    }
    space
}
