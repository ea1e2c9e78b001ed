use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct AudioControlsProps {
    pub muted: bool,
    pub volume: f64,
    pub on_toggle_mute: Callback<()>,
    pub on_volume_change: Callback<f64>,
}

#[function_component]
pub fn AudioControls(props: &AudioControlsProps) -> Html {
    let mute_cb = {
        let cb = props.on_toggle_mute.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let volume_cb = {
        let cb = props.on_volume_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Ok(v) = input.value().parse::<f64>() {
                cb.emit(v);
            }
        })
    };
    html! {
        <div style="position:absolute; bottom:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px 12px; display:flex; gap:8px; align-items:center; z-index:20;">
            <button onclick={mute_cb} style="padding:4px 8px;">
                { if props.muted { "🔇" } else { "🔊" } }
            </button>
            <input
                type="range"
                min="0"
                max="1"
                step="0.05"
                value={props.volume.to_string()}
                oninput={volume_cb}
                style="width:90px;"
            />
        </div>
    }
}
