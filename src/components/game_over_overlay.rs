use yew::prelude::*;

use crate::util::format_meters;

#[derive(Properties, PartialEq, Clone)]
pub struct GameOverOverlayProps {
    pub show: bool,
    pub reason: String,
    pub score: i64,
    pub rounds_played: u32,
    pub total_distance: f64,
    pub restart: Callback<()>,
}

#[function_component]
pub fn GameOverOverlay(props: &GameOverOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let restart_cb = props.restart.clone();
    let restart_btn = Callback::from(move |_: MouseEvent| restart_cb.emit(()));
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #f85149; padding:24px 32px; border-radius:12px; text-align:center; min-width:320px; color:#e6edf3; z-index:50;">
            <h2 style="margin:0 0 6px 0; color:#f85149;">{"Game Over"}</h2>
            <p style="margin:0 0 12px 0; opacity:0.8;">{ props.reason.clone() }</p>
            <p style="margin:4px 0;">{ format!("Final Score: {}", props.score) }</p>
            <p style="margin:4px 0;">{ format!("Rounds Played: {}", props.rounds_played) }</p>
            <p style="margin:4px 0;">{ format!("Total Miss Distance: {}", format_meters(props.total_distance)) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={restart_btn}>{"Play Again"}</button>
            </div>
        </div>
    }
}
