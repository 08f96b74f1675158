use force_graph::SimulationParameters;

/// Tunables for edge inference and node sizing.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// Both endpoints need at least this proficiency for a category edge.
	pub category_threshold: u8,
	pub sampled_threshold: u8,
	/// The sampled rule only runs when at least this many nodes qualify.
	pub sampled_min_members: usize,
	pub sampled_max_edges: usize,
	/// Name (or category) substrings whose skills belong together.
	pub complementary_pairs: Vec<(String, String)>,
	pub complementary_strength: f64,
	pub sampled_strength: f64,

	pub default_category: String,
	pub default_proficiency: u8,
	pub radius_base: f64,
	pub radius_scale: f64,
	pub radius_min: f64,
	pub radius_max: f64,

	pub force: ForceConfig,
}

/// Category given to skills that do not declare one.
pub const DEFAULT_CATEGORY: &str = "Other";

const COMPLEMENTARY_PAIRS: &[(&str, &str)] = &[
	("Penetration Testing", "Network Security"),
	("Penetration Testing", "Web Application"),
	("Malware Analysis", "Reverse Engineering"),
	("Incident Response", "Digital Forensics"),
	("Incident Response", "Threat Intelligence"),
	("SIEM", "Threat Hunting"),
	("Cloud Security", "DevSecOps"),
	("Kubernetes", "Container Security"),
	("Python", "Automation"),
	("Cryptography", "PKI"),
	("Burp Suite", "OWASP"),
	("Wireshark", "Network Security"),
];

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			category_threshold: 40,
			sampled_threshold: 70,
			sampled_min_members: 6,
			sampled_max_edges: 10,
			complementary_pairs: COMPLEMENTARY_PAIRS
				.iter()
				.map(|&(a, b)| (a.to_string(), b.to_string()))
				.collect(),
			complementary_strength: 0.6,
			sampled_strength: 0.1,
			default_category: DEFAULT_CATEGORY.into(),
			default_proficiency: 50,
			radius_base: 8.0,
			radius_scale: 4.5,
			radius_min: 8.0,
			radius_max: 30.0,
			force: ForceConfig::default(),
		}
	}
}

#[cfg(test)]
impl GraphConfig {
	pub fn with_complementary_pairs(mut self, pairs: &[(&str, &str)]) -> Self {
		self.complementary_pairs = pairs
			.iter()
			.map(|&(a, b)| (a.to_string(), b.to_string()))
			.collect();
		self
	}
}

/// Simulation tunables. The first five go straight to `force_graph`, the
/// rest drive the forces the layout adds on top.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,

	/// Fraction of the centroid offset removed per tick.
	pub center_strength: f64,
	pub collision_margin: f64,
	/// Rest length of the strongest links.
	pub link_distance: f64,
	/// Extra rest length for the weakest links.
	pub link_distance_spread: f64,
	pub link_strength: f64,

	pub alpha_decay: f64,
	pub alpha_min: f64,
	pub reheat_alpha: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			force_charge: 400.0,
			force_spring: 0.02,
			force_max: 120.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			center_strength: 0.1,
			collision_margin: 4.0,
			link_distance: 70.0,
			link_distance_spread: 110.0,
			link_strength: 0.25,
			alpha_decay: 0.0228,
			alpha_min: 0.001,
			reheat_alpha: 0.3,
		}
	}
}

impl ForceConfig {
	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}
