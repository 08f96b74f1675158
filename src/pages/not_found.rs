use leptos::prelude::*;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"404"</h1>
			<p>"Nothing at this address."</p>
			<a href="/">"Back to skills"</a>
		</div>
	}
}
