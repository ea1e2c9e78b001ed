mod audio;
mod components;
mod geo;
mod model;
mod scoring;
mod state;
mod timer;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
