use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ScoreDisplayProps {
    pub score: i64,
    pub round_number: u32,
    pub time_bonus: f64,
    pub is_phase_two: bool,
}

#[function_component]
pub fn ScoreDisplay(props: &ScoreDisplayProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:210px; display:flex; flex-direction:column; gap:8px; font-size:14px; color:#e6edf3; z-index:20;">
            <div style={row_style}>
                <span style={format!("{} color:#d4af37;", label_style)}>{"Score"}</span>
                <span style={format!("{} color:#d4af37;", value_style)}>{ props.score }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#58a6ff;", label_style)}>{"Round"}</span>
                <span style={format!("{} color:#58a6ff;", value_style)}>{ props.round_number }</span>
            </div>
            { if props.time_bonus > 0.0 {
                html! { <div style="font-size:11px; opacity:0.7;">{ format!("+{:.1}s time bonus", props.time_bonus) }</div> }
            } else { html! {} } }
            { if props.is_phase_two {
                html! { <div style="font-size:11px; color:#32CD32; font-weight:600;">{"Phase 2"}</div> }
            } else { html! {} } }
        </div>
    }
}
