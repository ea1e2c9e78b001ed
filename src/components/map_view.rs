use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::model::{
    COUNTDOWN_ARM_DELAY_MS, COUNTDOWN_TICK_MS, COUNTDOWN_TICK_SECS, FEEDBACK_GRACE_MS, GameAction,
    GameState,
};
use crate::state::Camera;
use crate::timer::{Interval, Timeout};

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub game: UseReducerHandle<GameState>,
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let camera = use_mut_ref(Camera::default);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let game_ref = use_mut_ref(|| props.game.clone());
    // Keep the handle the draw/listener closures read current.
    *game_ref.borrow_mut() = props.game.clone();

    // Countdown interval: alive exactly while the round is live and unpaused.
    {
        let game = props.game.clone();
        let deps = (
            props.game.is_counting_down,
            props.game.paused,
            props.game.game_over,
        );
        use_effect_with(deps, move |(counting, paused, over)| {
            let timer = if *counting && !*paused && !*over {
                let game = game.clone();
                Some(Interval::new(COUNTDOWN_TICK_MS, move || {
                    game.dispatch(GameAction::Tick {
                        dt: COUNTDOWN_TICK_SECS,
                    });
                }))
            } else {
                None
            };
            move || drop(timer)
        });
    }

    // Arm the countdown shortly after a round is set up (and after resume).
    {
        let game = props.game.clone();
        let deps = (
            props.game.game_started,
            props.game.game_over,
            props.game.paused,
            props.game.is_counting_down,
            props.game.show_feedback,
            props.game.show_phase_intro,
            props.game.round_number,
        );
        use_effect_with(deps, move |(started, over, paused, counting, feedback, intro, _)| {
            let timer = if *started && !*over && !*paused && !*counting && !*feedback && !*intro {
                let game = game.clone();
                Some(Timeout::new(COUNTDOWN_ARM_DELAY_MS, move || {
                    game.dispatch(GameAction::BeginCountdown);
                }))
            } else {
                None
            };
            move || drop(timer)
        });
    }

    // Feedback chain: grace delay, then the progress-decay interval. Both
    // handles die together on pause, game over, interstitial or advance.
    {
        let game = props.game.clone();
        let deps = (
            props.game.show_feedback,
            props.game.paused,
            props.game.game_over,
            props.game.show_phase_intro,
            props.game.round_number,
        );
        use_effect_with(deps, move |(show, paused, over, intro, _)| {
            let chain = if *show && !*paused && !*over && !*intro {
                let slot: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
                let slot_for_timeout = slot.clone();
                let timeout = Timeout::new(FEEDBACK_GRACE_MS, move || {
                    let game = game.clone();
                    *slot_for_timeout.borrow_mut() =
                        Some(Interval::new(COUNTDOWN_TICK_MS, move || {
                            game.dispatch(GameAction::FeedbackTick {
                                dt: COUNTDOWN_TICK_SECS,
                                roll: js_sys::Math::random(),
                            });
                        }));
                });
                Some((timeout, slot))
            } else {
                None
            };
            move || drop(chain)
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let camera = camera.clone();
        let game_ref_setup = game_ref.clone();
        let draw_ref_setup = draw_ref.clone();

        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no global `window` exists");
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");

            let compute_and_apply_canvas_size = {
                let canvas = canvas.clone();
                let window = window.clone();
                move || {
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0);
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0);
                    canvas.set_width(width.max(0.0) as u32);
                    canvas.set_height(height.max(0.0) as u32);
                }
            };
            compute_and_apply_canvas_size();

            // Build the draw closure and stash it for listeners and the RAF loop.
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let camera = camera.clone();
                let game_ref = game_ref_setup.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas.get_context("2d").ok().flatten() {
                        Some(c) => c.dyn_into::<CanvasRenderingContext2d>().unwrap(),
                        None => return,
                    };
                    let w = canvas.width() as f64;
                    let h = canvas.height() as f64;
                    ctx.set_fill_style_str("#0e1116");
                    ctx.fill_rect(0.0, 0.0, w, h);

                    let handle = game_ref.borrow();
                    let gs = (**handle).clone();
                    drop(handle);
                    let Some(dataset) = gs.dataset.clone() else {
                        return;
                    };

                    let mut cam = camera.borrow_mut();
                    if !cam.initialized {
                        cam.fit(dataset.bounds(), w, h);
                    }

                    let trace_ring = |ring: &[crate::geo::LatLng], cam: &Camera| {
                        ctx.begin_path();
                        for (i, p) in ring.iter().enumerate() {
                            let (x, y) = cam.to_screen(*p);
                            if i == 0 {
                                ctx.move_to(x, y);
                            } else {
                                ctx.line_to(x, y);
                            }
                        }
                        ctx.close_path();
                    };

                    for n in dataset.iter() {
                        trace_ring(&n.ring, &cam);
                        ctx.set_fill_style_str("#161b22");
                        ctx.fill();
                        if gs.revealed_neighborhoods.contains(&n.name) {
                            if n.name == gs.current_neighborhood {
                                ctx.set_fill_style_str("rgba(46,160,67,0.45)");
                                ctx.fill();
                                ctx.set_stroke_style_str("#2ea043");
                                ctx.set_line_width(2.0);
                            } else {
                                ctx.set_fill_style_str("rgba(248,81,73,0.35)");
                                ctx.fill();
                                ctx.set_stroke_style_str("#f85149");
                                ctx.set_line_width(1.5);
                            }
                        } else {
                            ctx.set_stroke_style_str("#2f3641");
                            ctx.set_line_width(1.0);
                        }
                        ctx.stroke();
                    }

                    // Miss arrow: dashed line towards the nearest boundary point.
                    if let Some((from, to)) = gs.arrow_path {
                        let (x1, y1) = cam.to_screen(from);
                        let (x2, y2) = cam.to_screen(to);
                        let dash = js_sys::Array::new();
                        dash.push(&wasm_bindgen::JsValue::from_f64(10.0));
                        dash.push(&wasm_bindgen::JsValue::from_f64(10.0));
                        ctx.set_line_dash(dash.as_ref()).ok();
                        ctx.begin_path();
                        ctx.move_to(x1, y1);
                        ctx.line_to(x2, y2);
                        ctx.set_stroke_style_str("#FF0000");
                        ctx.set_line_width(3.0);
                        ctx.stroke();
                        ctx.set_line_dash(js_sys::Array::new().as_ref()).ok();
                        // Arrowhead at the boundary end.
                        let ang = (y2 - y1).atan2(x2 - x1);
                        ctx.begin_path();
                        ctx.move_to(x2, y2);
                        ctx.line_to(
                            x2 - 12.0 * (ang - 0.4).cos(),
                            y2 - 12.0 * (ang - 0.4).sin(),
                        );
                        ctx.line_to(
                            x2 - 12.0 * (ang + 0.4).cos(),
                            y2 - 12.0 * (ang + 0.4).sin(),
                        );
                        ctx.close_path();
                        ctx.set_fill_style_str("#FF0000");
                        ctx.fill();
                    }

                    // Planted flag at the clicked position.
                    if let Some(p) = gs.clicked_position {
                        let (x, y) = cam.to_screen(p);
                        ctx.begin_path();
                        ctx.move_to(x, y);
                        ctx.line_to(x, y - 20.0);
                        ctx.set_stroke_style_str("#e6edf3");
                        ctx.set_line_width(2.0);
                        ctx.stroke();
                        ctx.begin_path();
                        ctx.move_to(x, y - 20.0);
                        ctx.line_to(x + 12.0, y - 15.0);
                        ctx.line_to(x, y - 10.0);
                        ctx.close_path();
                        ctx.set_fill_style_str("#f85149");
                        ctx.fill();
                        ctx.begin_path();
                        ctx.arc(x, y, 3.0, 0.0, std::f64::consts::PI * 2.0).ok();
                        ctx.set_fill_style_str("#e6edf3");
                        ctx.fill();
                    }
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());
            (draw_closure)();

            // Animation frame loop keeps the canvas in sync with state.
            let raf_id = Rc::new(RefCell::new(None));
            {
                let raf_id_clone = raf_id.clone();
                let draw_ref_loop = draw_ref_setup.clone();
                let window_loop = window.clone();
                let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
                    Rc::new(RefCell::new(None));
                let closure_cell_clone = closure_cell.clone();
                *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    if let Some(f) = &*draw_ref_loop.borrow() {
                        f();
                    }
                    if let Ok(id) = window_loop.request_animation_frame(
                        closure_cell_clone
                            .borrow()
                            .as_ref()
                            .unwrap()
                            .as_ref()
                            .unchecked_ref(),
                    ) {
                        *raf_id_clone.borrow_mut() = Some(id);
                    }
                }) as Box<dyn FnMut()>));
                if let Ok(id) = window.request_animation_frame(
                    closure_cell
                        .borrow()
                        .as_ref()
                        .unwrap()
                        .as_ref()
                        .unchecked_ref(),
                ) {
                    *raf_id.borrow_mut() = Some(id);
                }
            }

            // Wheel: zoom about the cursor.
            let wheel_cb = {
                let camera = camera.clone();
                let draw_ref = draw_ref_setup.clone();
                Closure::wrap(Box::new(move |e: web_sys::WheelEvent| {
                    e.prevent_default();
                    let mut cam = camera.borrow_mut();
                    let zoom_change = (-e.delta_y() * 0.001).exp();
                    cam.zoom_about(e.offset_x() as f64, e.offset_y() as f64, zoom_change);
                    drop(cam);
                    if let Some(f) = &*draw_ref.borrow() {
                        f();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .unwrap();

            // Left button guesses; other buttons pan.
            let mousedown_cb = {
                let camera = camera.clone();
                let game_ref = game_ref_setup.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    if e.button() == 0 {
                        let cam = camera.borrow();
                        let pos = cam.to_latlng(e.offset_x() as f64, e.offset_y() as f64);
                        drop(cam);
                        // The reducer's countdown gate decides whether this
                        // click counts; a stale or double click is a no-op.
                        game_ref.borrow().dispatch(GameAction::MapClick { pos });
                    } else {
                        let mut cam = camera.borrow_mut();
                        cam.panning = true;
                        cam.last_x = e.client_x() as f64;
                        cam.last_y = e.client_y() as f64;
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref())
                .unwrap();

            let mousemove_cb = {
                let camera = camera.clone();
                let draw_ref = draw_ref_setup.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let mut cam = camera.borrow_mut();
                    if !cam.panning {
                        return;
                    }
                    let x = e.client_x() as f64;
                    let y = e.client_y() as f64;
                    let dx = x - cam.last_x;
                    let dy = y - cam.last_y;
                    cam.last_x = x;
                    cam.last_y = y;
                    cam.offset_x += dx;
                    cam.offset_y += dy;
                    drop(cam);
                    if let Some(f) = &*draw_ref.borrow() {
                        f();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref())
                .unwrap();

            let mouseup_cb = {
                let camera = camera.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    camera.borrow_mut().panning = false;
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .unwrap();

            let contextmenu_cb = {
                Closure::wrap(Box::new(move |e: web_sys::Event| {
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            let resize_cb = {
                let compute_and_apply_canvas_size = compute_and_apply_canvas_size.clone();
                let draw_ref = draw_ref_setup.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    compute_and_apply_canvas_size();
                    if let Some(f) = &*draw_ref.borrow() {
                        f();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .unwrap();

            let window_clone = window.clone();
            move || {
                let _ = canvas
                    .remove_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());
                let _ = canvas.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone
                    .remove_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref());
                let _ = window_clone
                    .remove_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
                if let Some(id) = *raf_id.borrow() {
                    let _ = window_clone.cancel_animation_frame(id);
                }
                // Keep closures alive until cleanup runs.
                let _keep_alive = (
                    &wheel_cb,
                    &mousedown_cb,
                    &mousemove_cb,
                    &mouseup_cb,
                    &contextmenu_cb,
                    &resize_cb,
                );
            }
        });
    }

    html! {
        <canvas
            ref={canvas_ref.clone()}
            id="map-canvas"
            style="display:block; width:100%; height:100%; cursor:crosshair;"
        />
    }
}
