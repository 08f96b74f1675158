use leptos::prelude::*;
use log::{error, info};

use crate::components::skill_graph::{
	DEFAULT_CATEGORY, GraphStatus, Palette, SelectedNode, SkillGraphCanvas, SkillRecord,
};
use crate::content;

/// Distinct categories in order of first appearance, each with the color
/// its nodes are drawn in. Uncategorised skills fall under the default
/// category and nameless ones are skipped, as they are in the graph.
fn legend(skills: &[SkillRecord]) -> Vec<(String, String)> {
	let mut palette = Palette::default();
	let mut categories: Vec<String> = Vec::new();
	for category in skills.iter().filter(|s| !s.name.trim().is_empty()).map(|s| {
		s.category
			.as_deref()
			.map(str::trim)
			.filter(|c| !c.is_empty())
			.unwrap_or(DEFAULT_CATEGORY)
	}) {
		if !categories.iter().any(|c| c == category) {
			categories.push(category.to_string());
		}
	}
	categories
		.into_iter()
		.map(|c| {
			let color = palette.color_for(&c);
			(c, color)
		})
		.collect()
}

/// Skills page: search, category chips and the skill graph.
#[component]
pub fn Home() -> impl IntoView {
	let (skills, set_skills) = signal(Vec::<SkillRecord>::new());
	let (status, set_status) = signal(GraphStatus::Loading);
	let search = RwSignal::new(String::new());
	let category = RwSignal::new(None::<String>);
	let last_viewed = RwSignal::new(None::<String>);

	// Bundled content stands in for the CMS fetch.
	Effect::new(move |_| match content::load_skills() {
		Ok(records) => {
			info!("loaded {} skills", records.len());
			set_status.set(if records.is_empty() {
				GraphStatus::Empty
			} else {
				GraphStatus::Ready
			});
			set_skills.set(records);
		}
		Err(e) => {
			error!("{e}");
			set_status.set(GraphStatus::Invalid);
		}
	});

	let chips = Memo::new(move |_| skills.with(|s| legend(s)));
	let on_select = move |selection: SelectedNode| last_viewed.set(Some(selection.node.name));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<section class="skills-page">
				<header class="skills-header">
					<h1>"Skill Matrix"</h1>
					<p class="subtitle">
						"Click a node for details. Drag to pin, scroll to zoom, drag the background to pan."
					</p>
					<input
						type="search"
						class="skills-search"
						placeholder="Search skills or categories"
						prop:value=move || search.get()
						on:input=move |ev| search.set(event_target_value(&ev))
					/>
					<nav class="skills-filter">
						<button
							class="chip"
							class:active=move || category.with(Option::is_none)
							on:click=move |_| category.set(None)
						>
							"All"
						</button>
						{move || {
							chips
								.get()
								.into_iter()
								.map(|(name, color)| {
									let (active_name, click_name) = (name.clone(), name.clone());
									view! {
										<button
											class="chip"
											class:active=move || {
												category.with(|c| c.as_deref() == Some(active_name.as_str()))
											}
											on:click=move |_| category.set(Some(click_name.clone()))
										>
											<span class="swatch" style=format!("background: {color}")></span>
											{name}
										</button>
									}
								})
								.collect_view()
						}}
					</nav>
				</header>

				<div class="skills-graph">
					<SkillGraphCanvas
						skills=skills
						status=status
						search=search
						category=category
						on_select=on_select
					/>
				</div>

				<footer class="skills-footer">
					{move || last_viewed.get().map(|name| format!("Last viewed: {name}"))}
				</footer>
			</section>
		</ErrorBoundary>
	}
}
