mod api;
mod config;
mod controller;
mod document;
mod render;
mod runtime;
mod status;
mod upload;
mod view;

use futures_util::SinkExt;
use iced::{
    event::{self, Event as IcedEvent},
    futures::channel::mpsc::Sender,
    time, window, Element, Font, Subscription, Task, Theme,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use api::ApiClient;
use controller::{AppState, Effect, Event, Settings};
use document::PendingFile;

fn main() -> iced::Result {
    let loaded = config::Config::load();
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => config::Config::default(),
    };

    init_logging(&config.log_level);
    if let Err(e) = loaded {
        tracing::warn!(error = %format!("{e:#}"), "falling back to default config");
    }
    tracing::info!(backend = %config.backend.base_url, "starting");

    let window_settings = window::Settings {
        size: iced::Size::new(config.window.width as f32, config.window.height as f32),
        min_size: Some(iced::Size::new(
            config.window.min_width as f32,
            config.window.min_height as f32,
        )),
        position: window::Position::Centered,
        ..Default::default()
    };

    iced::application("PDF Summary", App::update, App::view)
        .theme(App::theme)
        .subscription(App::subscription)
        .window(window_settings)
        .default_font(Font::MONOSPACE)
        .run_with(move || App::new(&config))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[derive(Debug, Clone)]
pub enum Message {
    App(Event),
    Tick,
}

struct App {
    state: AppState,
    client: ApiClient,
    loading_frame: usize,
}

impl App {
    fn new(config: &config::Config) -> (Self, Task<Message>) {
        let settings = Settings {
            accepted_extensions: config.upload.accepted_extensions.clone(),
            progress_reset: Duration::from_millis(config.upload.progress_reset_ms),
        };
        let (state, effects) = AppState::init(settings);

        let app = App {
            state,
            client: ApiClient::new(config.backend.base_url.clone()),
            loading_frame: 0,
        };
        let startup = app.run_effects(effects);
        (app, startup)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(event) => {
                let (next, effects) = std::mem::take(&mut self.state).apply(event);
                self.state = next;
                self.run_effects(effects)
            }
            Message::Tick => {
                if self.state.is_loading() {
                    self.loading_frame = (self.loading_frame + 1) % 80;
                }
                Task::none()
            }
        }
    }

    fn run_effects(&self, effects: Vec<Effect>) -> Task<Message> {
        Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
    }

    fn run_effect(&self, effect: Effect) -> Task<Message> {
        let client = self.client.clone();
        match effect {
            Effect::Upload(file) => upload_task(client, file),
            effect => Task::future(async move {
                Message::App(runtime::perform(client, effect, upload::progress_fn(|_| {})).await)
            }),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let timer = if self.state.is_loading() {
            time::every(Duration::from_millis(80)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };

        let files = event::listen_with(|event, _status, _id| match event {
            IcedEvent::Window(window::Event::FileHovered(_)) => Some(Message::App(Event::DragEntered)),
            IcedEvent::Window(window::Event::FilesHoveredLeft) => Some(Message::App(Event::DragLeft)),
            IcedEvent::Window(window::Event::FileDropped(path)) => {
                Some(Message::App(Event::FileDropped(path)))
            }
            _ => None,
        });

        Subscription::batch([timer, files])
    }

    fn view(&self) -> Element<Message> {
        view::page(&self.state, self.loading_frame)
    }

    fn theme(&self) -> Theme {
        Theme::TokyoNight
    }
}

/// Runs the upload and forwards byte progress as messages ahead of the final
/// result, so the bar moves while the request body is still being sent.
fn upload_task(client: ApiClient, file: PendingFile) -> Task<Message> {
    Task::stream(iced::stream::channel(64, move |mut output: Sender<Message>| async move {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let progress = upload::progress_fn(move |p| {
            let _ = tx.send(p);
        });

        let upload = runtime::perform(client, Effect::Upload(file), progress);
        tokio::pin!(upload);

        let outcome = loop {
            tokio::select! {
                Some(p) = rx.recv() => {
                    let _ = output.send(Message::App(Event::UploadProgressed(p))).await;
                }
                outcome = &mut upload => break outcome,
            }
        };

        while let Ok(p) = rx.try_recv() {
            let _ = output.send(Message::App(Event::UploadProgressed(p))).await;
        }
        let _ = output.send(Message::App(outcome)).await;
    }))
}
