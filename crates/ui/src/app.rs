use std::time::{Duration, Instant};

use engine::{
    FfmpegRenderBridge, MediaKind, PreviewConfig, ScenePreview, TrimHandle, TrimSnapshot,
};
use iced::widget::{button, column, row, text, text_input};
use iced::{Element, Length, Subscription, Task};

use crate::surface::SharedSurface;
use crate::widgets::preview::{self, PreviewImage};
use crate::widgets::transport::{self, TransportHandlers, TransportState};

const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    MediaPathChanged(String),
    LoadPressed,
    PlayPausePressed,
    Scrubbed(f64),
    ScrubReleased,
    TrimEditToggled(bool),
    TrimStartMoved(f64),
    TrimEndMoved(f64),
    TrimReleased,
    Tick,
}

type Preview = ScenePreview<FfmpegRenderBridge<SharedSurface>>;

/// Root UI state: one scene preview driven from this update loop.
pub struct AppState {
    surface: SharedSurface,
    preview: Option<Preview>,
    media_path: String,
    status: String,
}

impl AppState {
    pub fn boot() -> (Self, Task<Message>) {
        (
            Self {
                surface: SharedSurface::default(),
                preview: None,
                media_path: String::new(),
                status: String::from("enter a media path"),
            },
            Task::none(),
        )
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::MediaPathChanged(path) => {
                self.media_path = path;
            }
            Message::LoadPressed => {
                let path = self.media_path.trim().to_owned();
                if path.is_empty() {
                    self.status = String::from("media path is empty");
                } else {
                    self.mount(path);
                }
            }
            Message::PlayPausePressed => {
                if let Some(preview) = self.preview.as_mut() {
                    if preview.is_playing() {
                        preview.pause();
                        self.status = String::from("paused");
                    } else {
                        match preview.play() {
                            Ok(()) => self.status = String::from("playing"),
                            Err(error) => self.status = format!("error: {error}"),
                        }
                    }
                }
            }
            Message::Scrubbed(time) => {
                if let Some(preview) = self.preview.as_mut() {
                    if preview.active_drag().is_none() {
                        preview.begin_scrubber_drag();
                    }
                    preview.update_scrubber_drag(time);
                }
            }
            Message::ScrubReleased => {
                if let Some(preview) = self.preview.as_mut() {
                    preview.end_scrubber_drag();
                }
            }
            Message::TrimEditToggled(enabled) => {
                if let Some(preview) = self.preview.as_mut() {
                    preview.set_trim_edit(enabled);
                }
            }
            Message::TrimStartMoved(time) => {
                if let Some(preview) = self.preview.as_mut() {
                    if preview.active_drag().is_none() {
                        preview.begin_trim_drag(TrimHandle::Start);
                    }
                    preview.update_trim_drag(time);
                }
            }
            Message::TrimEndMoved(time) => {
                if let Some(preview) = self.preview.as_mut() {
                    if preview.active_drag().is_none() {
                        preview.begin_trim_drag(TrimHandle::End);
                    }
                    preview.update_trim_drag(time);
                }
            }
            Message::TrimReleased => {
                if let Some(preview) = self.preview.as_mut() {
                    preview.end_trim_drag();
                }
            }
            Message::Tick => {
                if let Some(preview) = self.preview.as_mut() {
                    preview.tick(Instant::now());
                }
            }
        }

        Task::none()
    }

    fn mount(&mut self, path: String) {
        self.surface.clear();
        let config = PreviewConfig {
            kind: kind_for_path(&path),
            media_url: path.clone(),
            audio_url: None,
            trim: TrimSnapshot {
                start: 0.0,
                end: 0.0,
            },
            scene_id: 0,
            project_id: 0,
        };
        // Remounting goes through the preview so the old bridge is disposed
        // before the new source initializes on this surface.
        let result = match self.preview.as_mut() {
            Some(preview) => preview.replace_media(config),
            None => {
                let bridge = FfmpegRenderBridge::new(self.surface.clone());
                let mut preview = ScenePreview::new(config, bridge);
                let result = preview.load();
                self.preview = Some(preview);
                result
            }
        };
        match result {
            Ok(()) => self.status = format!("loaded {path}"),
            Err(error) => self.status = format!("error: {error}"),
        }
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let load_row = row![
            text_input("media path or url", &self.media_path).on_input(Message::MediaPathChanged),
            button("Load").on_press(Message::LoadPressed),
        ]
        .spacing(12);

        let frame = self.surface.latest();
        let image = frame.as_ref().and_then(PreviewImage::from_frame);
        let preview_area = preview::view(image.as_ref());

        let state = match self.preview.as_ref() {
            Some(preview) => TransportState {
                ready: preview.is_ready(),
                is_playing: preview.is_playing(),
                visual_time: preview.visual_time(),
                trim_start: preview.trim_start(),
                trim_end: preview.effective_trim_end(),
                duration: preview.duration(),
                trim_edit: preview.trim_edit_enabled(),
            },
            None => TransportState {
                ready: false,
                is_playing: false,
                visual_time: 0.0,
                trim_start: 0.0,
                trim_end: 0.0,
                duration: None,
                trim_edit: false,
            },
        };
        let transport = transport::view(
            state,
            TransportHandlers {
                on_play_pause: Message::PlayPausePressed,
                on_scrub: Message::Scrubbed,
                on_scrub_release: Message::ScrubReleased,
                on_trim_toggle: Message::TrimEditToggled,
                on_trim_start: Message::TrimStartMoved,
                on_trim_end: Message::TrimEndMoved,
                on_trim_release: Message::TrimReleased,
            },
        );

        column![
            load_row,
            iced::widget::container(preview_area).height(Length::Fill),
            transport,
            text(format!("Status: {}", self.status)),
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    /// Delivers frame ticks only while the sync loop is running.
    pub fn subscription(&self) -> Subscription<Message> {
        match self.preview.as_ref() {
            Some(preview) if preview.needs_tick() => {
                iced::time::every(TICK_INTERVAL).map(|_| Message::Tick)
            }
            _ => Subscription::none(),
        }
    }
}

/// Guesses the media kind from the path extension. Anything that is not a
/// known still-image format plays as video.
fn kind_for_path(path: &str) -> MediaKind {
    let extension = path
        .rsplit('.')
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" | "jpg" | "jpeg" | "webp" | "bmp" => MediaKind::Image,
        _ => MediaKind::Video,
    }
}

#[cfg(test)]
mod tests {
    use engine::MediaKind;

    use super::{AppState, Message, kind_for_path};

    #[test]
    fn kind_is_inferred_from_the_extension() {
        assert_eq!(kind_for_path("scene.mp4"), MediaKind::Video);
        assert_eq!(kind_for_path("photo.PNG"), MediaKind::Image);
        assert_eq!(kind_for_path("clip.webm"), MediaKind::Video);
        assert_eq!(kind_for_path("no-extension"), MediaKind::Video);
    }

    #[test]
    fn load_with_an_empty_path_sets_an_error_status() {
        let (mut app, _) = AppState::boot();
        let _ = app.update(Message::LoadPressed);
        assert_eq!(app.status, "media path is empty");
        assert!(app.preview.is_none());
    }

    #[test]
    fn reloading_remounts_through_the_existing_preview() {
        let (mut app, _) = AppState::boot();
        let _ = app.update(Message::MediaPathChanged("missing-a.mp4".to_owned()));
        let _ = app.update(Message::LoadPressed);
        assert!(app.preview.is_some());

        let _ = app.update(Message::MediaPathChanged("missing-b.mp4".to_owned()));
        let _ = app.update(Message::LoadPressed);
        assert!(app.preview.is_some());
    }

    #[test]
    fn messages_before_any_preview_are_ignored() {
        let (mut app, _) = AppState::boot();
        let _ = app.update(Message::PlayPausePressed);
        let _ = app.update(Message::Scrubbed(3.0));
        let _ = app.update(Message::Tick);
        assert!(app.preview.is_none());
    }
}
