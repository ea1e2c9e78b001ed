use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::Response;
use yew::prelude::*;

use crate::audio::GameAudio;
use crate::geo::NeighborhoodSet;
use crate::model::{GameAction, GameState, PHASE_ONE_INTRO_MS};
use crate::timer::Timeout;
use crate::util::{cerror, clog};

use super::{
    audio_controls::AudioControls,
    feedback_panel::FeedbackPanel,
    game_controls::GameControls,
    game_over_overlay::GameOverOverlay,
    map_view::MapView,
    phase_overlays::{PhaseOneMessage, PhaseTwoIntro},
    score_display::ScoreDisplay,
};

const DATASET_URL: &str = "data/bairros.geojson";

/// One-time dataset load; a failure leaves the game on the loading screen.
async fn fetch_dataset() -> Result<NeighborhoodSet, String> {
    let window = web_sys::window().ok_or_else(|| "no global window".to_string())?;
    let resp_value = JsFuture::from(window.fetch_with_str(DATASET_URL))
        .await
        .map_err(|e| format!("fetch failed: {e:?}"))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "fetch did not yield a Response".to_string())?;
    if !resp.ok() {
        return Err(format!("dataset request returned HTTP {}", resp.status()));
    }
    let text_promise = resp.text().map_err(|e| format!("{e:?}"))?;
    let text_value = JsFuture::from(text_promise)
        .await
        .map_err(|e| format!("{e:?}"))?;
    let text = text_value
        .as_string()
        .ok_or_else(|| "dataset body was not text".to_string())?;
    NeighborhoodSet::from_geojson(&text).map_err(|e| e.to_string())
}

#[function_component(App)]
pub fn app() -> Html {
    let game = use_reducer(GameState::default);
    let audio = use_mut_ref(GameAudio::new);
    let show_start_message = use_state(|| false);

    // Fetch the dataset once at mount.
    {
        let game = game.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match fetch_dataset().await {
                    Ok(set) => {
                        clog(&format!("dataset loaded: {} neighborhoods", set.len()));
                        game.dispatch(GameAction::DatasetLoaded(Rc::new(set)));
                    }
                    Err(e) => {
                        cerror(&format!("failed to load neighborhood dataset: {e}"));
                        game.dispatch(GameAction::DatasetFailed);
                    }
                }
            });
            || ()
        });
    }

    // Space pauses/resumes.
    {
        let game = game.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().unwrap();
            let key_cb = {
                let game = game.clone();
                Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
                    if e.code() == "Space" {
                        e.prevent_default();
                        game.dispatch(GameAction::TogglePause);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("keydown", key_cb.as_ref().unchecked_ref())
                .unwrap();
            move || {
                let _ = window
                    .remove_event_listener_with_callback("keydown", key_cb.as_ref().unchecked_ref());
                drop(key_cb);
            }
        });
    }

    // Render sound cues; the reducer bumps `sound_seq` per cue.
    {
        let audio = audio.clone();
        let game_for_audio = game.clone();
        use_effect_with(game.sound_seq, move |seq| {
            if *seq > 0 {
                if let Some(cue) = game_for_audio.sound {
                    audio
                        .borrow()
                        .play(cue, game_for_audio.volume, game_for_audio.muted);
                }
            }
            || ()
        });
    }

    // The start command shows the phase-1 message briefly, then starts.
    {
        let game = game.clone();
        let show_start_message = show_start_message.clone();
        let show = *show_start_message;
        use_effect_with(show, move |show| {
            let timer = if *show {
                let game = game.clone();
                let show_start_message = show_start_message.clone();
                Some(Timeout::new(PHASE_ONE_INTRO_MS, move || {
                    show_start_message.set(false);
                    game.dispatch(GameAction::StartGame {
                        roll: js_sys::Math::random(),
                    });
                }))
            } else {
                None
            };
            move || drop(timer)
        });
    }

    let on_start = {
        let game = game.clone();
        let show_start_message = show_start_message.clone();
        Callback::from(move |_| {
            if game.dataset.is_some() && !*show_start_message {
                show_start_message.set(true);
            }
        })
    };
    let on_toggle_pause = {
        let game = game.clone();
        Callback::from(move |_| game.dispatch(GameAction::TogglePause))
    };
    let on_next_round = {
        let game = game.clone();
        Callback::from(move |_| {
            game.dispatch(GameAction::NextRound {
                roll: js_sys::Math::random(),
            })
        })
    };
    let on_phase_continue = {
        let game = game.clone();
        Callback::from(move |_| {
            game.dispatch(GameAction::AcknowledgePhaseIntro {
                roll: js_sys::Math::random(),
            })
        })
    };
    let on_toggle_mute = {
        let game = game.clone();
        Callback::from(move |_| game.dispatch(GameAction::ToggleMute))
    };
    let on_volume_change = {
        let game = game.clone();
        Callback::from(move |v: f64| game.dispatch(GameAction::SetVolume(v)))
    };

    let loading = game.dataset.is_none() && !game.load_failed;
    html! {
        <div style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#0e1116; color:#e6edf3; font-family:sans-serif;">
            <MapView game={game.clone()} />
            { if loading {
                html! {
                    <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.8); padding:20px 28px; border-radius:10px; z-index:70;">
                        {"Loading the map..."}
                    </div>
                }
            } else { html! {} } }
            { if game.load_failed {
                html! {
                    <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:1px solid #f85149; padding:20px 28px; border-radius:10px; z-index:70; color:#f85149;">
                        {"Could not load the neighborhood map. Reload the page to try again."}
                    </div>
                }
            } else { html! {} } }
            { if game.game_started {
                html! {
                    <ScoreDisplay
                        score={game.score}
                        round_number={game.round_number}
                        time_bonus={game.time_bonus}
                        is_phase_two={game.is_phase_two}
                    />
                }
            } else { html! {} } }
            { if !game.show_feedback && !game.load_failed && !*show_start_message {
                html! {
                    <GameControls
                        game_started={game.game_started}
                        game_over={game.game_over}
                        paused={game.paused}
                        dataset_ready={game.dataset.is_some()}
                        current_neighborhood={game.current_neighborhood.clone()}
                        time_left={game.time_left}
                        round_initial_time={game.round_initial_time}
                        on_start={on_start.clone()}
                        on_toggle_pause={on_toggle_pause.clone()}
                    />
                }
            } else { html! {} } }
            { match (game.show_feedback, game.last_outcome, game.game_over, game.show_phase_intro) {
                (true, Some(outcome), false, false) => html! {
                    <FeedbackPanel
                        outcome={outcome}
                        message={game.feedback_message.clone()}
                        click_time={game.click_time}
                        feedback_progress={game.feedback_progress}
                        on_next_round={on_next_round.clone()}
                    />
                },
                _ => html! {},
            } }
            { if game.game_started {
                html! {
                    <AudioControls
                        muted={game.muted}
                        volume={game.volume}
                        on_toggle_mute={on_toggle_mute.clone()}
                        on_volume_change={on_volume_change.clone()}
                    />
                }
            } else { html! {} } }
            { if game.paused && !game.game_over {
                html! {
                    <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.75); padding:16px 32px; border-radius:10px; z-index:45; font-size:20px; font-weight:600;">
                        {"Paused"}
                    </div>
                }
            } else { html! {} } }
            <PhaseOneMessage show={*show_start_message} />
            <PhaseTwoIntro show={game.show_phase_intro} on_continue={on_phase_continue.clone()} />
            <GameOverOverlay
                show={game.game_over}
                reason={game.game_over_reason.map(|r| r.label().to_string()).unwrap_or_default()}
                score={game.score}
                rounds_played={game.round_number}
                total_distance={game.total_distance}
                restart={on_start.clone()}
            />
        </div>
    }
}
