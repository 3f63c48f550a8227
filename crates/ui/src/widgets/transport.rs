use iced::widget::{button, checkbox, column, row, slider, text};
use iced::{Element, Length};

/// Playback state the transport row renders from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportState {
    pub ready: bool,
    pub is_playing: bool,
    pub visual_time: f64,
    pub trim_start: f64,
    pub trim_end: f64,
    pub duration: Option<f64>,
    pub trim_edit: bool,
}

/// Messages the transport row emits.
pub struct TransportHandlers<Message> {
    pub on_play_pause: Message,
    pub on_scrub: fn(f64) -> Message,
    pub on_scrub_release: Message,
    pub on_trim_toggle: fn(bool) -> Message,
    pub on_trim_start: fn(f64) -> Message,
    pub on_trim_end: fn(f64) -> Message,
    pub on_trim_release: Message,
}

/// Renders the transport controls: play/pause, the scrubber bound to the
/// visual clock, and the trim-handle sliders when editing is enabled.
pub fn view<'a, Message>(
    state: TransportState,
    handlers: TransportHandlers<Message>,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let label = if state.is_playing { "Pause" } else { "Play" };
    let mut play_pause = button(label);
    if state.ready {
        play_pause = play_pause.on_press(handlers.on_play_pause);
    }

    let scrubber = slider(
        state.trim_start..=state.trim_end.max(state.trim_start),
        state.visual_time,
        handlers.on_scrub,
    )
    .on_release(handlers.on_scrub_release)
    .step(0.01)
    .width(Length::Fill);

    let transport_row = row![
        play_pause,
        scrubber,
        text(format!(
            "{} / {}",
            format_seconds(state.visual_time),
            format_seconds(state.trim_end)
        )),
    ]
    .spacing(12);

    let trim_toggle = checkbox("Adjust trim", state.trim_edit).on_toggle(handlers.on_trim_toggle);

    let mut controls = column![transport_row, trim_toggle].spacing(12);
    if state.trim_edit {
        let start_row = row![
            text("Start"),
            slider(
                0.0..=state.trim_end.max(0.0),
                state.trim_start,
                handlers.on_trim_start
            )
            .on_release(handlers.on_trim_release.clone())
            .step(0.01)
            .width(Length::Fill),
            text(format_seconds(state.trim_start)),
        ]
        .spacing(12);
        let end_max = state.duration.unwrap_or(state.trim_end).max(state.trim_end);
        let end_row = row![
            text("End"),
            slider(0.0..=end_max, state.trim_end, handlers.on_trim_end)
            .on_release(handlers.on_trim_release)
            .step(0.01)
            .width(Length::Fill),
            text(format_seconds(state.trim_end)),
        ]
        .spacing(12);
        controls = controls.push(start_row).push(end_row);
    }

    controls.into()
}

/// Formats seconds as `m:ss.t`.
pub fn format_seconds(seconds: f64) -> String {
    let clamped = seconds.max(0.0);
    let mut minutes = (clamped / 60.0).floor() as u64;
    // Round to tenths before splitting so 59.97 carries into the minute
    // instead of rendering as "0:60.0".
    let mut rest = ((clamped - minutes as f64 * 60.0) * 10.0).round() / 10.0;
    if rest >= 60.0 {
        minutes += 1;
        rest = 0.0;
    }
    format!("{minutes}:{rest:04.1}")
}

#[cfg(test)]
mod tests {
    use super::format_seconds;

    #[test]
    fn formats_seconds_with_minutes_and_tenths() {
        assert_eq!(format_seconds(0.0), "0:00.0");
        assert_eq!(format_seconds(7.52), "0:07.5");
        assert_eq!(format_seconds(65.0), "1:05.0");
        assert_eq!(format_seconds(59.97), "1:00.0");
        assert_eq!(format_seconds(-3.0), "0:00.0");
    }
}
