//! Skill content bundled with the site.

use crate::components::skill_graph::{GraphError, SkillRecord};

const SKILLS_JSON: &str = include_str!("../assets/skills.json");

pub fn load_skills() -> Result<Vec<SkillRecord>, GraphError> {
	decode_skills(SKILLS_JSON)
}

fn decode_skills(json: &str) -> Result<Vec<SkillRecord>, GraphError> {
	Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_skills_decode() {
		let skills = load_skills().unwrap();
		assert!(skills.len() > 20);
		assert!(skills.iter().all(|s| !s.name.trim().is_empty()));
	}

	#[test]
	fn optional_fields_may_be_missing() {
		let skills = decode_skills(r#"[{ "name": "Nmap" }]"#).unwrap();
		assert_eq!(skills[0].id, None);
		assert_eq!(skills[0].proficiency, None);
	}

	#[test]
	fn malformed_content_is_a_parse_error() {
		assert!(matches!(decode_skills("[{"), Err(GraphError::Parse(_))));
	}
}
