use std::collections::HashMap;

const KNOWN: &[(&str, &str)] = &[
	("Offensive Security", "#ff3b5c"),
	("Network Security", "#00e5ff"),
	("Cloud Security", "#7c4dff"),
	("Application Security", "#ffb300"),
	("Defensive Security", "#00e676"),
	("Digital Forensics", "#ff6d00"),
	("Programming", "#40c4ff"),
	("Tools", "#b2ff59"),
];

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Assigns each category a color: well-known ones get their own, the rest
/// cycle through the fallback palette in order of first appearance.
#[derive(Debug, Default)]
pub struct Palette {
	assigned: HashMap<String, &'static str>,
	next: usize,
}

impl Palette {
	pub fn color_for(&mut self, category: &str) -> String {
		if let Some(color) = self.assigned.get(category) {
			return (*color).into();
		}
		let color = KNOWN
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(category))
			.map(|&(_, color)| color)
			.unwrap_or_else(|| {
				let color = COLORS[self.next % COLORS.len()];
				self.next += 1;
				color
			});
		self.assigned.insert(category.to_string(), color);
		color.into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_categories_have_fixed_colors() {
		let mut palette = Palette::default();
		assert_eq!(palette.color_for("Cloud Security"), "#7c4dff");
		assert_eq!(palette.color_for("cloud security"), "#7c4dff");
	}

	#[test]
	fn unknown_categories_cycle_in_order() {
		let mut palette = Palette::default();
		assert_eq!(palette.color_for("Hobbies"), COLORS[0]);
		assert_eq!(palette.color_for("Languages"), COLORS[1]);
		assert_eq!(palette.color_for("Hobbies"), COLORS[0]);
	}
}
