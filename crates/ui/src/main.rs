mod app;
mod surface;
mod widgets;

use app::AppState;

fn main() -> iced::Result {
    init_tracing();

    iced::application("Scene Preview", AppState::update, AppState::view)
        .subscription(AppState::subscription)
        .run_with(AppState::boot)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}
