use yew::prelude::*;

use crate::model::{PHASE_TWO_ROUND_TIME, PHASE_TWO_SCORE};

#[derive(Properties, PartialEq, Clone)]
pub struct PhaseOneMessageProps {
    pub show: bool,
}

/// Short auto-dismissed banner shown while the first round is being set up.
#[function_component]
pub fn PhaseOneMessage(props: &PhaseOneMessageProps) -> Html {
    if !props.show {
        return html! {};
    }
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); padding:20px 28px; border-radius:10px; z-index:60; text-align:center; color:#e6edf3;">
            <h2 style="font-size:1.4em; color:#32CD32; margin:0 0 10px 0;">{"Phase 1: the best-known neighborhoods"}</h2>
            <p style="margin:0; font-size:1.1em;">
                { format!("Score {PHASE_TWO_SCORE} points to unlock phase 2!") }
            </p>
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PhaseTwoIntroProps {
    pub show: bool,
    pub on_continue: Callback<()>,
}

/// Blocking interstitial shown once when phase 2 unlocks; the next round
/// does not start until it is acknowledged.
#[function_component]
pub fn PhaseTwoIntro(props: &PhaseTwoIntroProps) -> Html {
    if !props.show {
        return html! {};
    }
    let continue_cb = {
        let cb = props.on_continue.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    html! {
        <div style="position:absolute; inset:0; background:rgba(0,0,0,0.9); display:flex; flex-direction:column; justify-content:center; align-items:center; z-index:60; padding:20px; text-align:center; color:#e6edf3;">
            <h1 style="font-size:2.4em; color:#32CD32; margin-bottom:16px;">{"Phase 2 unlocked!"}</h1>
            <p style="font-size:1.3em; margin-bottom:22px; max-width:600px; line-height:1.4;">
                {"You clearly know your way around. Now things get harder..."}
            </p>
            <ul style="font-size:1.1em; margin-bottom:26px; text-align:left; max-width:460px; list-style:disc;">
                <li style="margin-bottom:8px;">{ format!("Rounds shrink to {PHASE_TWO_ROUND_TIME:.0} seconds") }</li>
                <li style="margin-bottom:8px;">{"Every neighborhood is now in play"}</li>
                <li style="margin-bottom:8px;">{"The near-border bonus band tightens"}</li>
                <li style="margin-bottom:8px;">{"Drift too far in total and the game ends"}</li>
            </ul>
            <button onclick={continue_cb} style="padding:14px 28px; font-size:1.2em; background:#32CD32; color:#fff; border:none; border-radius:10px; cursor:pointer; font-weight:bold;">
                {"Start Phase 2"}
            </button>
        </div>
    }
}
