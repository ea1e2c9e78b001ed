//! Game aggregate and reducer.
//!
//! Every gameplay transition is a [`GameAction`] reduced by the single pure
//! reducer below; components only dispatch. Actions that need a random draw
//! carry the roll as data so reduction itself stays deterministic and
//! testable off-browser.

use std::collections::HashSet;
use std::rc::Rc;
use yew::Reducible;

use crate::geo::{LatLng, NeighborhoodSet, closest_point_on_ring};
use crate::scoring::{self, HitKind, MAX_SCORED_DISTANCE_M};

pub const PHASE_ONE_ROUND_TIME: f64 = 10.0;
pub const PHASE_TWO_ROUND_TIME: f64 = 7.0;
/// Cumulative score that unlocks phase 2.
pub const PHASE_TWO_SCORE: i64 = 5_000;
/// Accumulated negative magnitude that ends the game.
pub const NEGATIVE_SUM_LIMIT: f64 = 40.0;
/// Phase 2 only: cumulative miss distance that ends the game.
pub const PHASE_TWO_DISTANCE_LIMIT_M: f64 = 10_000.0;

pub const COUNTDOWN_TICK_MS: u32 = 100;
pub const COUNTDOWN_TICK_SECS: f64 = 0.1;
/// Delay between a round being set up and its countdown arming.
pub const COUNTDOWN_ARM_DELAY_MS: u32 = 100;
/// Grace period after a click before the feedback bar starts draining.
pub const FEEDBACK_GRACE_MS: u32 = 500;
/// How long the phase-1 start message stays up.
pub const PHASE_ONE_INTRO_MS: u32 = 3_000;

/// Phase-1 target pool: the best-known neighborhoods. Names must match the
/// dataset's `NOME` property; unknown entries are simply never drawn.
pub const PHASE_ONE_POOL: &[&str] = &[
    "Gonzaga",
    "Ponta da Praia",
    "José Menino",
    "Embaré",
    "Aparecida",
    "Boqueirão",
    "Centro",
    "Valongo",
    "Paquetá",
    "Vila Nova",
    "Vila Mathias",
    "Campo Grande",
    "Marapé",
    "Vila Belmiro",
    "Encruzilhada",
    "Macuco",
    "Estuário",
    "Rádio Clube",
    "Castelo",
    "Areia Branca",
    "Morro do José Menino",
    "Morro da Nova Cintra",
    "Morro do Marapé",
    "Morro da Penha",
];

/// Everything the phase flip changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseRules {
    pub round_time: f64,
    pub near_border_m: f64,
    pub feedback_secs: f64,
    pub negative_limit: f64,
    pub distance_limit_m: Option<f64>,
}

impl PhaseRules {
    pub fn for_phase(phase_two: bool) -> Self {
        if phase_two {
            Self {
                round_time: PHASE_TWO_ROUND_TIME,
                near_border_m: 10.0,
                feedback_secs: 4.0,
                negative_limit: NEGATIVE_SUM_LIMIT,
                distance_limit_m: Some(PHASE_TWO_DISTANCE_LIMIT_M),
            }
        } else {
            Self {
                round_time: PHASE_ONE_ROUND_TIME,
                near_border_m: 100.0,
                feedback_secs: 6.0,
                negative_limit: NEGATIVE_SUM_LIMIT,
                distance_limit_m: None,
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Success,
    Error,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    TimeUp,
    NegativeScore,
    DriftedTooFar,
}

impl GameOverReason {
    pub fn label(self) -> &'static str {
        match self {
            GameOverReason::TimeUp => "Time ran out",
            GameOverReason::NegativeScore => "Too many wild guesses",
            GameOverReason::DriftedTooFar => "Total miss distance too large",
        }
    }
}

/// What a resolved click produced, kept for the feedback panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickOutcome {
    pub distance_m: f64,
    pub hit: Option<HitKind>,
    pub distance_points: i64,
    pub time_points: i64,
    pub total_points: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub dataset: Option<Rc<NeighborhoodSet>>,
    pub load_failed: bool,

    pub current_neighborhood: String,
    pub score: i64,
    pub time_left: f64,
    pub total_time_left: f64,
    pub round_initial_time: f64,
    pub round_number: u32,
    pub time_bonus: f64,

    pub game_started: bool,
    pub game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
    pub is_counting_down: bool,
    pub paused: bool,

    pub clicked_position: Option<LatLng>,
    pub arrow_path: Option<(LatLng, LatLng)>,
    pub revealed_neighborhoods: HashSet<String>,

    pub show_feedback: bool,
    pub feedback_progress: f64,
    pub feedback_opacity: f64,
    pub feedback_message: String,
    pub click_time: f64,
    pub last_outcome: Option<ClickOutcome>,

    pub total_distance: f64,
    pub negative_sum: f64,
    pub is_phase_two: bool,
    pub show_phase_intro: bool,

    pub muted: bool,
    pub volume: f64,
    pub sound: Option<SoundCue>,
    pub sound_seq: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            dataset: None,
            load_failed: false,
            current_neighborhood: String::new(),
            score: 0,
            time_left: PHASE_ONE_ROUND_TIME,
            total_time_left: PHASE_ONE_ROUND_TIME,
            round_initial_time: PHASE_ONE_ROUND_TIME,
            round_number: 1,
            time_bonus: 0.0,
            game_started: false,
            game_over: false,
            game_over_reason: None,
            is_counting_down: false,
            paused: false,
            clicked_position: None,
            arrow_path: None,
            revealed_neighborhoods: HashSet::new(),
            show_feedback: false,
            feedback_progress: 0.0,
            feedback_opacity: 0.0,
            feedback_message: String::new(),
            click_time: 0.0,
            last_outcome: None,
            total_distance: 0.0,
            negative_sum: 0.0,
            is_phase_two: false,
            show_phase_intro: false,
            muted: false,
            volume: 0.5,
            sound: None,
            sound_seq: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub enum GameAction {
    DatasetLoaded(Rc<NeighborhoodSet>),
    DatasetFailed,
    /// Start (or restart after game over). `roll` picks the first target.
    StartGame { roll: f64 },
    /// Arm the countdown after the per-round delay.
    BeginCountdown,
    /// Countdown tick while the round is live.
    Tick { dt: f64 },
    /// Map click; only honored while the countdown is running.
    MapClick { pos: LatLng },
    /// Feedback bar decay tick; advances the round when the bar empties.
    FeedbackTick { dt: f64, roll: f64 },
    /// Explicit "next round" from the feedback panel.
    NextRound { roll: f64 },
    /// Dismiss the phase-2 interstitial and start the first phase-2 round.
    AcknowledgePhaseIntro { roll: f64 },
    TogglePause,
    ToggleMute,
    SetVolume(f64),
}

impl GameState {
    pub fn rules(&self) -> PhaseRules {
        PhaseRules::for_phase(self.is_phase_two)
    }

    fn cue(&mut self, sound: SoundCue) {
        self.sound = Some(sound);
        self.sound_seq += 1;
    }

    fn phase_pool(&self) -> Option<&'static [&'static str]> {
        if self.is_phase_two {
            None
        } else {
            Some(PHASE_ONE_POOL)
        }
    }

    fn end_game(&mut self, reason: GameOverReason) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.game_over_reason = Some(reason);
        self.is_counting_down = false;
        self.show_phase_intro = false;
        self.cue(SoundCue::GameOver);
    }

    /// Set up the next round: settle the cross-round time budget, grant the
    /// score bonus, pick a fresh target from the current phase's pool and
    /// clear all transient click/feedback state. The countdown is armed
    /// separately after [`COUNTDOWN_ARM_DELAY_MS`].
    fn advance_round(&mut self, roll: f64) {
        let Some(dataset) = self.dataset.clone() else {
            return;
        };
        // `total_time_left` already paid for this round tick by tick; the
        // advance only grants the bonus and re-caps the per-round clock.
        let rules = self.rules();
        let bonus = scoring::time_bonus(self.score);
        self.total_time_left += bonus;
        self.time_left = self.total_time_left.min(rules.round_time);
        self.round_initial_time = self.time_left;
        self.time_bonus = bonus;
        self.round_number += 1;
        self.current_neighborhood = dataset.pick(self.phase_pool(), roll).name.clone();
        self.revealed_neighborhoods.clear();
        self.clicked_position = None;
        self.arrow_path = None;
        self.last_outcome = None;
        self.show_feedback = false;
        self.feedback_progress = 0.0;
        self.feedback_opacity = 0.0;
        self.feedback_message.clear();
        self.is_counting_down = false;
    }
}

impl Reducible for GameState {
    type Action = GameAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use GameAction::*;
        let mut new = (*self).clone();
        match action {
            DatasetLoaded(set) => {
                if new.dataset.is_some() {
                    return self;
                }
                new.dataset = Some(set);
                new.load_failed = false;
            }
            DatasetFailed => {
                new.load_failed = true;
            }
            StartGame { roll } => {
                let Some(dataset) = new.dataset.clone() else {
                    return self;
                };
                new.score = 0;
                new.negative_sum = 0.0;
                new.total_distance = 0.0;
                new.game_started = true;
                new.game_over = false;
                new.game_over_reason = None;
                new.is_phase_two = false;
                new.show_phase_intro = false;
                new.paused = false;
                new.round_number = 1;
                new.time_bonus = 0.0;
                new.total_time_left = PHASE_ONE_ROUND_TIME;
                new.time_left = PHASE_ONE_ROUND_TIME;
                new.round_initial_time = PHASE_ONE_ROUND_TIME;
                new.is_counting_down = false;
                new.current_neighborhood = dataset.pick(Some(PHASE_ONE_POOL), roll).name.clone();
                new.revealed_neighborhoods.clear();
                new.clicked_position = None;
                new.arrow_path = None;
                new.last_outcome = None;
                new.show_feedback = false;
                new.feedback_progress = 0.0;
                new.feedback_opacity = 0.0;
                new.feedback_message.clear();
            }
            BeginCountdown => {
                if !new.game_started
                    || new.game_over
                    || new.paused
                    || new.show_feedback
                    || new.show_phase_intro
                    || new.is_counting_down
                {
                    return self;
                }
                if new.time_left <= 0.0 {
                    // The carried budget is already exhausted.
                    new.feedback_message = "Time's up!".to_string();
                    new.end_game(GameOverReason::TimeUp);
                } else {
                    new.is_counting_down = true;
                }
            }
            Tick { dt } => {
                if !new.is_counting_down || new.paused || new.game_over {
                    return self;
                }
                new.time_left -= dt;
                new.total_time_left = (new.total_time_left - dt).max(0.0);
                if new.time_left <= 0.0 {
                    new.time_left = 0.0;
                    new.show_feedback = true;
                    new.feedback_opacity = 1.0;
                    new.feedback_progress = 100.0;
                    new.feedback_message = "Time's up!".to_string();
                    new.end_game(GameOverReason::TimeUp);
                }
            }
            MapClick { pos } => {
                // `is_counting_down` is the sole click gate; everything below
                // runs synchronously within this one reduction.
                if !new.is_counting_down || new.game_over {
                    return self;
                }
                let Some(dataset) = new.dataset.clone() else {
                    return self;
                };
                let rules = new.rules();
                let time_left = new.time_left.max(0.0);
                let clicked_name = dataset.containing(pos).map(|n| n.name.clone());
                // A missing target is a dataset mismatch: score it as a miss
                // at the distance cap instead of losing the round.
                let (distance_m, closest_point, inside) =
                    match dataset.find(&new.current_neighborhood) {
                        Some(target) => match closest_point_on_ring(pos, &target.ring) {
                            Ok(cp) => (cp.distance_m, Some(cp.point), target.contains(pos)),
                            Err(_) => (MAX_SCORED_DISTANCE_M, None, false),
                        },
                        None => (MAX_SCORED_DISTANCE_M, None, false),
                    };
                let hit = if inside {
                    Some(HitKind::Inside)
                } else if closest_point.is_some() && distance_m < rules.near_border_m {
                    Some(HitKind::NearBorder)
                } else {
                    None
                };
                let outcome = match hit {
                    Some(kind) => {
                        let Ok(bonus) =
                            scoring::hit_bonus(kind, time_left, new.round_initial_time)
                        else {
                            // Unreachable once a countdown armed with time on
                            // the clock; refuse the click over corrupting the
                            // score.
                            return self;
                        };
                        ClickOutcome {
                            distance_m,
                            hit,
                            distance_points: 0,
                            time_points: 0,
                            total_points: bonus.round() as i64,
                        }
                    }
                    None => {
                        let Ok(breakdown) = scoring::score_for(distance_m, time_left) else {
                            return self;
                        };
                        let distance_points = breakdown.distance_points.round() as i64;
                        let time_points = breakdown.time_points.round() as i64;
                        ClickOutcome {
                            distance_m,
                            hit,
                            distance_points,
                            time_points,
                            total_points: distance_points + time_points,
                        }
                    }
                };

                new.is_counting_down = false;
                new.clicked_position = Some(pos);
                new.click_time = new.round_initial_time - new.time_left;
                new.score += outcome.total_points;
                if outcome.total_points < 0 {
                    new.negative_sum += (-outcome.total_points) as f64;
                }
                if hit.is_none() {
                    new.total_distance += distance_m;
                }
                new.arrow_path = match (hit, closest_point) {
                    (None, Some(cp)) => Some((pos, cp)),
                    _ => None,
                };
                if let Some(name) = clicked_name {
                    new.revealed_neighborhoods.insert(name);
                }
                new.revealed_neighborhoods
                    .insert(new.current_neighborhood.clone());
                new.last_outcome = Some(outcome);
                new.show_feedback = true;
                new.feedback_opacity = 1.0;
                new.feedback_progress = 100.0;
                new.feedback_message = match hit {
                    Some(HitKind::NearBorder) => format!(
                        "Dead on! Right at the edge of the neighborhood: +{} points!",
                        outcome.total_points
                    ),
                    Some(HitKind::Inside) => format!(
                        "Excellent! Inside the neighborhood: +{} points!",
                        outcome.total_points
                    ),
                    None => scoring::feedback_message(distance_m).to_string(),
                };
                new.cue(if hit.is_some() {
                    SoundCue::Success
                } else {
                    SoundCue::Error
                });

                if !new.is_phase_two && new.score >= PHASE_TWO_SCORE {
                    new.is_phase_two = true;
                    new.show_phase_intro = true;
                    new.show_feedback = false;
                    new.feedback_opacity = 0.0;
                    new.feedback_progress = 0.0;
                }
                let rules = new.rules();
                if new.negative_sum > rules.negative_limit {
                    new.end_game(GameOverReason::NegativeScore);
                } else if let Some(limit) = rules.distance_limit_m {
                    if new.total_distance > limit {
                        new.end_game(GameOverReason::DriftedTooFar);
                    }
                }
            }
            FeedbackTick { dt, roll } => {
                if !new.show_feedback || new.paused || new.game_over || new.show_phase_intro {
                    return self;
                }
                let decay = 100.0 * dt / new.rules().feedback_secs;
                new.feedback_progress -= decay;
                if new.feedback_progress <= 0.0 {
                    new.advance_round(roll);
                }
            }
            NextRound { roll } => {
                if !new.show_feedback || new.game_over || new.show_phase_intro {
                    return self;
                }
                new.advance_round(roll);
            }
            AcknowledgePhaseIntro { roll } => {
                if !new.show_phase_intro || new.game_over {
                    return self;
                }
                new.show_phase_intro = false;
                new.advance_round(roll);
            }
            TogglePause => {
                if !new.game_started || new.game_over {
                    return self;
                }
                new.paused = !new.paused;
            }
            ToggleMute => {
                new.muted = !new.muted;
            }
            SetVolume(v) => {
                new.volume = v.clamp(0.0, 1.0);
                if new.volume > 0.0 {
                    new.muted = false;
                }
            }
        }
        Rc::new(new)
    }
}
