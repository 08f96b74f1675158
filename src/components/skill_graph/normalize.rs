//! Turns raw skill records into graph nodes.

use std::collections::HashSet;

use log::warn;

use super::config::GraphConfig;
use super::error::{GraphError, Result};
use super::palette::Palette;
use super::types::{GraphNode, SkillRecord};

/// Normalize `records` into nodes.
///
/// Blank names are dropped, missing fields defaulted and proficiency clamped
/// to `0..=100`. Two records supplying the same id is an error. Records
/// without an id get a slug of their name, suffixed until it is free.
pub fn normalize_skills(records: &[SkillRecord], config: &GraphConfig) -> Result<Vec<GraphNode>> {
	let mut seen = HashSet::new();
	for id in records
		.iter()
		.filter(|r| !r.name.trim().is_empty())
		.filter_map(supplied_id)
	{
		if !seen.insert(id.to_string()) {
			return Err(GraphError::DuplicateId(id.to_string()));
		}
	}

	let mut palette = Palette::default();
	let mut nodes = Vec::with_capacity(records.len());

	for (i, record) in records.iter().enumerate() {
		let name = record.name.trim();
		if name.is_empty() {
			warn!("dropping skill record {i}: empty name");
			continue;
		}

		let id = match supplied_id(record) {
			Some(id) => id.to_string(),
			None => free_slug(name, &mut seen),
		};

		let category = record
			.category
			.as_deref()
			.map(str::trim)
			.filter(|c| !c.is_empty())
			.unwrap_or(&config.default_category)
			.to_string();
		let proficiency = clamp_proficiency(name, record.proficiency, config.default_proficiency);

		nodes.push(GraphNode {
			weight: node_weight(proficiency, config),
			color: palette.color_for(&category),
			description: record
				.description
				.as_deref()
				.map(str::trim)
				.filter(|d| !d.is_empty())
				.map(String::from),
			id,
			name: name.to_string(),
			category,
			proficiency,
		});
	}

	Ok(nodes)
}

fn clamp_proficiency(name: &str, raw: Option<f64>, default: u8) -> u8 {
	match raw {
		Some(p) if p.is_nan() => {
			warn!("skill {name:?}: proficiency is not a number, using {default}");
			default
		}
		Some(p) if !(0.0..=100.0).contains(&p) => {
			warn!("skill {name:?}: proficiency {p} out of range, clamping");
			p.clamp(0.0, 100.0).round() as u8
		}
		Some(p) => p.round() as u8,
		None => default,
	}
}

/// Radius grows with proficiency but stays within the configured bounds.
pub fn node_weight(proficiency: u8, config: &GraphConfig) -> f64 {
	(config.radius_base + proficiency as f64 / config.radius_scale)
		.clamp(config.radius_min, config.radius_max)
}

fn supplied_id(record: &SkillRecord) -> Option<&str> {
	record.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}

/// Slug for `name` that is not yet in `taken`, which it is then added to.
fn free_slug(name: &str, taken: &mut HashSet<String>) -> String {
	let base = slug_id(name);
	let mut id = base.clone();
	let mut n = 2;
	while taken.contains(&id) {
		id = format!("{base}-{n}");
		n += 1;
	}
	taken.insert(id.clone());
	id
}

fn slug_id(name: &str) -> String {
	let mut slug = String::from("skill");
	let mut dash = true;
	for c in name.chars().flat_map(char::to_lowercase) {
		if c.is_alphanumeric() {
			if dash {
				slug.push('-');
				dash = false;
			}
			slug.push(c);
		} else {
			dash = true;
		}
	}
	slug
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn record(name: &str) -> SkillRecord {
		SkillRecord {
			name: name.into(),
			..Default::default()
		}
	}

	#[test]
	fn defaults_missing_fields() {
		let nodes = normalize_skills(&[record("Nmap")], &GraphConfig::default()).unwrap();
		assert_eq!(nodes.len(), 1);
		assert_eq!(nodes[0].id, "skill-nmap");
		assert_eq!(nodes[0].category, "Other");
		assert_eq!(nodes[0].proficiency, 50);
		assert_eq!(nodes[0].description, None);
	}

	#[test]
	fn drops_blank_names_and_keeps_the_rest() {
		let records = [record("  "), record(""), record("Burp Suite")];
		let nodes = normalize_skills(&records, &GraphConfig::default()).unwrap();
		assert_eq!(nodes.len(), 1);
		assert_eq!(nodes[0].name, "Burp Suite");
	}

	#[test]
	fn clamps_out_of_range_proficiency() {
		let low = SkillRecord::new("a", "A", "X", -20.0);
		let high = SkillRecord::new("b", "B", "X", 250.0);
		let nan = SkillRecord::new("c", "C", "X", f64::NAN);
		let nodes = normalize_skills(&[low, high, nan], &GraphConfig::default()).unwrap();
		assert_eq!(nodes[0].proficiency, 0);
		assert_eq!(nodes[1].proficiency, 100);
		assert_eq!(nodes[2].proficiency, 50);
	}

	#[test]
	fn weight_stays_in_bounds_at_extremes() {
		let config = GraphConfig::default();
		assert_eq!(node_weight(0, &config), 8.0);
		assert_eq!(node_weight(100, &config), 30.0);
		assert!(node_weight(40, &config) < node_weight(80, &config));
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let records = [
			SkillRecord::new("s1", "Nmap", "Network Security", 80.0),
			SkillRecord::new("s1", "Wireshark", "Network Security", 70.0),
		];
		let err = normalize_skills(&records, &GraphConfig::default()).unwrap_err();
		assert!(matches!(err, GraphError::DuplicateId(id) if id == "s1"));
	}

	#[test]
	fn colliding_slugs_get_suffixes() {
		let records = [record("C"), record("C#"), record("C++"), record("Nmap")];
		let nodes = normalize_skills(&records, &GraphConfig::default()).unwrap();
		let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["skill-c", "skill-c-2", "skill-c-3", "skill-nmap"]);
	}

	#[test]
	fn slugs_avoid_supplied_ids() {
		let records = [
			record("Nmap"),
			SkillRecord::new("skill-nmap", "Nmap Scripting", "Network Security", 60.0),
		];
		let nodes = normalize_skills(&records, &GraphConfig::default()).unwrap();
		assert_eq!(nodes[0].id, "skill-nmap-2");
		assert_eq!(nodes[1].id, "skill-nmap");
	}

	#[test]
	fn blank_record_ids_do_not_count_as_duplicates() {
		let records = [
			SkillRecord::new("s1", " ", "X", 10.0),
			SkillRecord::new("s1", "Nmap", "X", 10.0),
		];
		let nodes = normalize_skills(&records, &GraphConfig::default()).unwrap();
		assert_eq!(nodes.len(), 1);
	}

	#[test]
	fn slug_collapses_punctuation() {
		assert_eq!(slug_id("C/C++ & Rust"), "skill-c-c-rust");
		assert_eq!(slug_id("OWASP Top 10"), "skill-owasp-top-10");
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(64))]

		#[test]
		fn normalized_ids_are_unique(names in prop::collection::vec("[a-c +#]{0,4}", 0..20)) {
			let records: Vec<SkillRecord> = names.iter().map(|n| record(n)).collect();
			let nodes = normalize_skills(&records, &GraphConfig::default()).unwrap();
			let ids: HashSet<_> = nodes.iter().map(|n| n.id.as_str()).collect();
			prop_assert_eq!(ids.len(), nodes.len());
		}

		#[test]
		fn weight_is_monotonic(a in 0u8..=100, b in 0u8..=100) {
			let config = GraphConfig::default();
			if a <= b {
				prop_assert!(node_weight(a, &config) <= node_weight(b, &config));
			}
		}
	}
}
