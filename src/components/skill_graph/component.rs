use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::render;
use super::state::{PointerOutcome, SkillGraphState};
use super::types::{GraphStatus, SelectedNode, SkillRecord};

const FRAME_DT: f32 = 0.016;
const RESIZE_DEBOUNCE_MS: i32 = 150;

type Shared<T> = Rc<RefCell<Option<T>>>;

/// A `requestAnimationFrame` loop. Dropping it cancels the pending frame.
struct FrameLoop {
	alive: Rc<Cell<bool>>,
	pending: Rc<Cell<Option<i32>>>,
	callback: Shared<Closure<dyn FnMut()>>,
}

impl FrameLoop {
	fn start(mut frame: impl FnMut() + 'static) -> Self {
		let alive = Rc::new(Cell::new(true));
		let pending = Rc::new(Cell::new(None));
		let callback: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));

		let (alive_inner, pending_inner, callback_inner) =
			(alive.clone(), pending.clone(), callback.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			if !alive_inner.get() {
				return;
			}
			frame();
			if let Some(ref cb) = *callback_inner.borrow() {
				pending_inner.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *callback.borrow() {
			pending.set(request_frame(cb));
		}

		Self {
			alive,
			pending,
			callback,
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.alive.set(false);
		if let (Some(window), Some(id)) = (web_sys::window(), self.pending.take()) {
			let _ = window.cancel_animation_frame(id);
		}
		// breaks the closure's reference to itself
		self.callback.borrow_mut().take();
		debug!("frame loop stopped");
	}
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

/// Debounced window resize listener, removed on drop.
struct ResizeListener {
	window: Window,
	listener: Closure<dyn FnMut()>,
	timer: Rc<Cell<Option<i32>>>,
}

impl ResizeListener {
	fn attach(window: &Window, mut on_resize: impl FnMut() + 'static) -> Option<Self> {
		let timer = Rc::new(Cell::new(None));
		let timer_apply = timer.clone();
		let apply: Rc<Closure<dyn FnMut()>> = Rc::new(Closure::new(move || {
			timer_apply.set(None);
			on_resize();
		}));

		let timer_listen = timer.clone();
		let listener: Closure<dyn FnMut()> = Closure::new(move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			if let Some(id) = timer_listen.take() {
				window.clear_timeout_with_handle(id);
			}
			let apply: &Closure<dyn FnMut()> = &apply;
			timer_listen.set(
				window
					.set_timeout_with_callback_and_timeout_and_arguments_0(
						apply.as_ref().unchecked_ref(),
						RESIZE_DEBOUNCE_MS,
					)
					.ok(),
			);
		});

		window
			.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
			.ok()?;
		Some(Self {
			window: window.clone(),
			listener,
			timer,
		})
	}
}

impl Drop for ResizeListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.listener.as_ref().unchecked_ref());
		if let Some(id) = self.timer.take() {
			self.window.clear_timeout_with_handle(id);
		}
	}
}

/// Browser resources tied to one mounted canvas.
struct CanvasRuntime {
	_frames: FrameLoop,
	_resize: Option<ResizeListener>,
}

/// Requests coming from the detail panel.
#[derive(Clone, Debug, PartialEq)]
enum PanelRequest {
	Select(String),
	Clear,
}

fn window_size() -> Option<(f64, f64)> {
	let window = web_sys::window()?;
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn viewport(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		if let Some(size) = window_size() {
			return size;
		}
	}
	let parent = canvas.parent_element();
	let measure = |f: fn(&web_sys::Element) -> i32, fallback: f64| {
		parent
			.as_ref()
			.map(|p| f(p) as f64)
			.filter(|v| *v > 0.0)
			.unwrap_or(fallback)
	};
	(
		width.unwrap_or_else(|| measure(web_sys::Element::client_width, 800.0)),
		height.unwrap_or_else(|| measure(web_sys::Element::client_height, 600.0)),
	)
}

type HostSize = (Option<f64>, Option<f64>);

/// A host size change after the first observed value calls for a re-layout.
fn host_resized(previous: Option<HostSize>, size: HostSize) -> bool {
	previous.is_some_and(|p| p != size)
}

/// Size the canvas to its viewport and return the new dimensions.
fn fit_canvas(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let (w, h) = viewport(canvas, fullscreen, width, height);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	(w, h)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()?
		.dyn_into::<CanvasRenderingContext2d>()
		.ok()
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive skill graph drawn on a canvas, with its own detail panel.
#[component]
pub fn SkillGraphCanvas(
	#[prop(into)] skills: Signal<Vec<SkillRecord>>,
	#[prop(into, default = Signal::stored(GraphStatus::Ready))] status: Signal<GraphStatus>,
	#[prop(into, default = Signal::stored(String::new()))] search: Signal<String>,
	#[prop(into, default = Signal::stored(None))] category: Signal<Option<String>>,
	#[prop(optional)] config: Option<GraphConfig>,
	#[prop(optional, into)] on_select: Option<Callback<SelectedNode>>,
	#[prop(default = false)] fullscreen: bool,
	/// Fixed viewport width; the parent's width when `None`.
	#[prop(into, default = Signal::stored(None))]
	width: Signal<Option<f64>>,
	#[prop(into, default = Signal::stored(None))] height: Signal<Option<f64>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared<SkillGraphState> = Rc::new(RefCell::new(None));
	let runtime = StoredValue::new_local(None::<CanvasRuntime>);
	let config = config.unwrap_or_default();

	let mounted = RwSignal::new(false);
	let built = RwSignal::new(None::<GraphStatus>);
	let selected = RwSignal::new(None::<SelectedNode>);
	let panel_request = RwSignal::new(None::<PanelRequest>);

	let publish = move |selection: Option<SelectedNode>| {
		if let (Some(node), Some(cb)) = (&selection, on_select) {
			cb.run(node.clone());
		}
		selected.set(selection);
	};

	let state_init = state.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			error!("2d canvas context unavailable");
			return;
		};

		// the old loop must be gone before a new one starts
		runtime.set_value(None);

		let (w, h) = fit_canvas(
			&canvas,
			fullscreen,
			width.get_untracked(),
			height.get_untracked(),
		);
		*state_init.borrow_mut() = Some(SkillGraphState::new(
			config.clone(),
			w,
			h,
			js_sys::Date::now() as u64,
		));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize = ResizeListener::attach(&window, move || {
			let (nw, nh) = fit_canvas(
				&canvas_resize,
				fullscreen,
				width.try_get_untracked().flatten(),
				height.try_get_untracked().flatten(),
			);
			if let Some(s) = state_resize.borrow_mut().as_mut() {
				s.resize(nw, nh);
			}
		});

		let state_anim = state_init.clone();
		let frames = FrameLoop::start(move || {
			if let Some(s) = state_anim.borrow_mut().as_mut() {
				s.tick(FRAME_DT);
				render::render(s, &ctx);
			}
		});

		runtime.set_value(Some(CanvasRuntime {
			_frames: frames,
			_resize: resize,
		}));
		info!("skill graph mounted at {w}x{h}");
		mounted.set(true);
	});

	let state_rebuild = state.clone();
	Effect::new(move |_| {
		let ready = mounted.get();
		skills.with(|records| {
			if !ready {
				return;
			}
			let mut guard = state_rebuild.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let outcome = s.rebuild(records);
			s.set_category(category.get_untracked().as_deref());
			s.set_search(&search.get_untracked());
			built.set(match outcome {
				Ok(()) if s.graph.is_empty() => Some(GraphStatus::Empty),
				Ok(()) => None,
				Err(e) => {
					error!("skill graph could not be built: {e}");
					Some(GraphStatus::Invalid)
				}
			});
		});
		selected.set(None);
	});

	// host-driven dimension changes re-layout without a rebuild
	let state_size = state.clone();
	Effect::new(move |previous: Option<HostSize>| {
		let size = (width.get(), height.get());
		if !mounted.get() || !host_resized(previous, size) {
			return size;
		}
		let Some(canvas) = canvas_ref.get_untracked() else {
			return size;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = fit_canvas(&canvas, fullscreen, size.0, size.1);
		if let Some(s) = state_size.borrow_mut().as_mut() {
			s.resize(w, h);
		}
		size
	});

	let state_search = state.clone();
	Effect::new(move |_| {
		let term = search.get();
		if !mounted.get() {
			return;
		}
		if let Some(s) = state_search.borrow_mut().as_mut() {
			let matches = s.set_search(&term);
			debug!(
				"search {:?} matched {matches} skills",
				s.interaction.state().search_term
			);
		}
	});

	let state_category = state.clone();
	Effect::new(move |_| {
		let active = category.get();
		if !mounted.get() {
			return;
		}
		let cleared = state_category
			.borrow_mut()
			.as_mut()
			.is_some_and(|s| s.set_category(active.as_deref()));
		if cleared {
			selected.set(None);
		}
	});

	let state_panel = state.clone();
	Effect::new(move |_| {
		let Some(request) = panel_request.get() else {
			return;
		};
		let selection = {
			let mut guard = state_panel.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			match request {
				PanelRequest::Select(id) => s.select_id(&id),
				PanelRequest::Clear => {
					s.interaction.clear_selection();
					None
				}
			}
		};
		publish(selection);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_md.borrow_mut().as_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let hovering = state_mm.borrow_mut().as_mut().is_some_and(|s| {
			s.pointer_move(x, y);
			s.interaction.hovered().is_some()
		});
		if let Some(canvas) = canvas_ref.get_untracked() {
			let _ = web_sys::HtmlElement::style(&canvas)
				.set_property("cursor", if hovering { "pointer" } else { "grab" });
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let outcome = state_mu.borrow_mut().as_mut().map(|s| s.pointer_up());
		match outcome {
			Some(PointerOutcome::Selected(node)) => publish(Some(node)),
			Some(PointerOutcome::Cleared) => publish(None),
			_ => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_wh.borrow_mut().as_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let shown_status = Signal::derive(move || match status.get() {
		GraphStatus::Ready => built.get().unwrap_or(GraphStatus::Ready),
		other => other,
	});

	view! {
		<div class="skill-graph">
			<canvas
				node_ref=canvas_ref
				class="skill-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			{move || {
				shown_status
					.get()
					.message()
					.map(|message| view! { <div class="skill-graph-status">{message}</div> })
			}}
			<SkillDetailPanel selected=selected requests=panel_request />
		</div>
	}
}

#[component]
fn SkillDetailPanel(
	selected: RwSignal<Option<SelectedNode>>,
	requests: RwSignal<Option<PanelRequest>>,
) -> impl IntoView {
	move || {
		selected.get().map(|selection| {
			let node = selection.node;
			let connections = selection
				.connections
				.into_iter()
				.map(|connection| {
					let id = connection.node.id.clone();
					let reasons = connection
						.kinds
						.iter()
						.map(ToString::to_string)
						.collect::<Vec<_>>()
						.join(", ");
					view! {
						<li>
							<button
								class="skill-link"
								on:click=move |_| requests.set(Some(PanelRequest::Select(id.clone())))
							>
								{connection.node.name}
							</button>
							<span class="skill-link-reason">{reasons}</span>
						</li>
					}
				})
				.collect_view();

			view! {
				<aside class="skill-detail">
					<button
						class="skill-detail-close"
						on:click=move |_| requests.set(Some(PanelRequest::Clear))
					>
						"×"
					</button>
					<h2 style=format!("color: {}", node.color)>{node.name}</h2>
					<p class="skill-category">{node.category}</p>
					<div class="skill-meter">
						<div
							class="skill-meter-fill"
							style=format!("width: {}%", node.proficiency)
						></div>
					</div>
					<p class="skill-proficiency">{format!("{}% proficiency", node.proficiency)}</p>
					{node.description.map(|d| view! { <p class="skill-description">{d}</p> })}
					<h3>"Connected skills"</h3>
					<ul class="skill-links">{connections}</ul>
				</aside>
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn host_size_changes_are_detected_after_the_first_run() {
		assert!(!host_resized(None, (Some(800.0), None)));
		assert!(!host_resized(Some((Some(800.0), None)), (Some(800.0), None)));
		assert!(host_resized(Some((Some(800.0), None)), (Some(640.0), None)));
		assert!(host_resized(Some((None, None)), (None, Some(480.0))));
	}
}
