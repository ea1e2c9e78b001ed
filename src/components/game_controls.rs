use yew::prelude::*;

use crate::scoring::progress_bar_color;
use crate::util::format_secs;

#[derive(Properties, PartialEq, Clone)]
pub struct GameControlsProps {
    pub game_started: bool,
    pub game_over: bool,
    pub paused: bool,
    pub dataset_ready: bool,
    pub current_neighborhood: String,
    pub time_left: f64,
    pub round_initial_time: f64,
    pub on_start: Callback<()>,
    pub on_toggle_pause: Callback<()>,
}

#[function_component(GameControls)]
pub fn game_controls(props: &GameControlsProps) -> Html {
    let start_cb = {
        let cb = props.on_start.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let pause_cb = {
        let cb = props.on_toggle_pause.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    if !props.game_started {
        return html! {
            <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.87); border:2px solid #30363d; padding:28px 36px; border-radius:14px; max-width:520px; width:90%; font-size:14px; line-height:1.4; color:#e6edf3; z-index:40;">
                <h2 style="margin:0 0 12px 0; font-size:22px; color:#58a6ff; text-align:center;">{"Bairro Guess"}</h2>
                <p style="margin:4px 0 10px 0; text-align:center; opacity:0.85;">{"How well do you know the neighborhoods of Santos?"}</p>
                <ul style="margin:0 0 12px 18px; padding:0; list-style:disc; display:flex; flex-direction:column; gap:4px;">
                    <li>{"Each round names a neighborhood - click where it is on the map."}</li>
                    <li>{"The closer and the faster you click, the more points you earn."}</li>
                    <li>{"Landing inside (or right at the edge of) the target pays a big bonus."}</li>
                    <li>{"Wild guesses cost points; too many end the game."}</li>
                    <li>{"Press Space to pause and resume."}</li>
                </ul>
                <div style="display:flex; gap:12px; justify-content:center; margin-top:8px;">
                    <button onclick={start_cb} disabled={!props.dataset_ready}>
                        { if props.dataset_ready { "Start" } else { "Loading..." } }
                    </button>
                </div>
            </div>
        };
    }
    if props.game_over {
        return html! {};
    }

    let fraction = if props.round_initial_time > 0.0 {
        (props.time_left / props.round_initial_time).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let pause_label = if props.paused { "Resume (Space)" } else { "Pause (Space)" };
    html! {
        <div style="position:absolute; top:12px; left:50%; transform:translateX(-50%); display:flex; flex-direction:column; align-items:center; gap:6px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 16px; min-width:260px; color:#e6edf3; z-index:20;">
            <div style="font-size:13px; opacity:0.75;">{"Find:"}</div>
            <div style="font-size:20px; font-weight:600;">{ props.current_neighborhood.clone() }</div>
            <div style="width:100%; height:6px; background:#30363d; border-radius:3px;">
                <div style={format!(
                    "width:{}%; height:100%; background:{}; border-radius:3px; transition:width 0.1s linear;",
                    fraction * 100.0,
                    progress_bar_color(fraction)
                )} />
            </div>
            <div style="display:flex; gap:10px; align-items:center;">
                <span style="font-variant-numeric:tabular-nums; font-weight:600;">{ format_secs(props.time_left) }</span>
                <button onclick={pause_cb} style="padding:4px 10px; font-size:12px;">{ pause_label }</button>
            </div>
        </div>
    }
}
