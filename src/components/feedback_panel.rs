use yew::prelude::*;

use crate::model::ClickOutcome;
use crate::scoring::progress_bar_color;
use crate::util::{format_meters, format_secs};

#[derive(Properties, PartialEq, Clone)]
pub struct FeedbackPanelProps {
    pub outcome: ClickOutcome,
    pub message: String,
    pub click_time: f64,
    pub feedback_progress: f64,
    pub on_next_round: Callback<()>,
}

#[function_component]
pub fn FeedbackPanel(props: &FeedbackPanelProps) -> Html {
    let next_cb = {
        let cb = props.on_next_round.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let breakdown_row = |label: &str, color: &str, points: i64| -> Html {
        html! {
            <div style={format!("display:flex; justify-content:space-between; align-items:center; font-size:14px; color:{}; margin-bottom:6px;", color)}>
                <span>{ label.to_string() }</span>
                <span style="font-weight:bold; font-size:18px;">{ format!("{points:+}") }</span>
            </div>
        }
    };
    let fraction = (props.feedback_progress / 100.0).clamp(0.0, 1.0);
    html! {
        <div style="position:absolute; top:80px; right:20px; background:rgba(22,27,34,0.95); border:1px solid #30363d; padding:18px; border-radius:12px; text-align:center; z-index:30; min-width:280px; max-width:340px; color:#e6edf3;">
            <h3 style="color:#32CD32; margin:0 0 12px 0; font-size:16px;">{ props.message.clone() }</h3>
            <div style="display:flex; justify-content:space-around; gap:20px; margin-bottom:14px; padding:8px; background:rgba(0,0,0,0.25); border-radius:8px;">
                <div>
                    <div style="font-size:26px; font-weight:bold; font-family:monospace;">
                        { format_meters(props.outcome.distance_m) }
                    </div>
                    <div style="opacity:0.6; font-size:12px; margin-top:2px;">{"off target"}</div>
                </div>
                <div>
                    <div style="font-size:26px; font-weight:bold; font-family:monospace;">
                        { format_secs(props.click_time) }
                    </div>
                    <div style="opacity:0.6; font-size:12px; margin-top:2px;">{"to click"}</div>
                </div>
            </div>
            <div style="margin-bottom:14px;">
                { if props.outcome.hit.is_some() {
                    breakdown_row("Hit bonus:", "#32CD32", props.outcome.total_points)
                } else {
                    html! {
                        <>
                            { breakdown_row("Distance:", "#4CAF50", props.outcome.distance_points) }
                            { breakdown_row("Speed:", "#FFA500", props.outcome.time_points) }
                        </>
                    }
                } }
                <div style="display:flex; justify-content:space-between; align-items:center; border-top:1px solid #30363d; padding-top:8px; font-weight:bold;">
                    <span>{"Total:"}</span>
                    <span style="color:#FF6B6B; font-size:22px;">{ format!("{:+}", props.outcome.total_points) }</span>
                </div>
            </div>
            <div style="width:100%; height:4px; background:#30363d; border-radius:2px; margin-bottom:12px;">
                <div style={format!(
                    "width:{}%; height:100%; background:{}; border-radius:2px; transition:width 0.1s linear;",
                    props.feedback_progress.clamp(0.0, 100.0),
                    progress_bar_color(fraction)
                )} />
            </div>
            <button onclick={next_cb} style="padding:8px 20px; font-weight:bold;">{"Next"}</button>
        </div>
    }
}
