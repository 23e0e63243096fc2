use color_eyre::Result;
use crossbeam::channel::Receiver;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind, poll, read,
    },
    execute,
};
use ratatui::{
    DefaultTerminal,
    layout::{Flex, Position},
    prelude::*,
    widgets::{Block, Gauge, Paragraph},
};
use std::{
    io::stdout,
    time::{Duration, Instant},
};
use tracing::info;
use tui_big_text::{BigText, PixelSize};

use crate::{
    audio_player::{AudioPlayer, PlayerEvent},
    controller::{PlaybackController, PlaybackState},
    themes::Theme,
    time_format::format_timestamp,
};

// Upper bound on how long the loop sleeps waiting for input while paused
const IDLE_POLL: Duration = Duration::from_millis(100);

struct App<P> {
    controller: PlaybackController<P>,
    events_rx: Receiver<PlayerEvent>,
    theme: Theme,
    asset: String,
    seek_step: f64,
    // where the slider and the toggle were last drawn, for mouse hit tests
    slider_area: Rect,
    slider_track: Rect,
    toggle_area: Rect,
}

impl<P: AudioPlayer> App<P> {
    fn new(
        controller: PlaybackController<P>,
        events_rx: Receiver<PlayerEvent>,
        theme: Theme,
        asset: String,
        seek_step: f64,
    ) -> Self {
        Self {
            controller,
            events_rx,
            theme,
            asset,
            seek_step,
            slider_area: Rect::default(),
            slider_track: Rect::default(),
            toggle_area: Rect::default(),
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        f.render_widget(Block::default().style(self.theme.base()), area);

        let [title, label, total, slider, toggle, help, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(area);

        let slider_block = self.slider_block();
        self.slider_area = slider;
        self.slider_track = slider_block.inner(slider);
        self.toggle_area = Self::centered(toggle, 14);

        let screen = self.controller.screen();
        let state = match self.controller.state() {
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        };
        f.render_widget(
            Line::from(format!("playdeck · {} · {state}", self.asset))
                .style(self.theme.muted())
                .centered(),
            title,
        );

        let big_label = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(self.theme.accent())
            .lines(vec![Line::from(screen.label.as_str())])
            .centered()
            .build();
        f.render_widget(big_label, label);

        f.render_widget(
            Line::from(format!("/ {}", format_timestamp(screen.slider.max())))
                .style(self.theme.muted())
                .centered(),
            total,
        );

        let gauge = Gauge::default()
            .block(slider_block)
            .gauge_style(
                Style::default()
                    .fg(self.theme.highlight)
                    .bg(self.theme.dimmed),
            )
            .use_unicode(true)
            .label("")
            .ratio(screen.slider.ratio());
        f.render_widget(gauge, slider);

        f.render_widget(self.toggle_button(), self.toggle_area);

        f.render_widget(
            Line::from("space play/pause · ←/→ seek · drag slider to scrub · q quit")
                .style(self.theme.muted())
                .centered(),
            help,
        );

        if let Some(message) = &screen.status {
            f.render_widget(
                Line::from(message.as_str())
                    .style(Style::default().fg(self.theme.error).bg(self.theme.background))
                    .centered(),
                status,
            );
        }
    }

    fn slider_block(&self) -> Block<'static> {
        let title = if self.controller.screen().slider.is_tracking() {
            " progress · seeking "
        } else {
            " progress "
        };
        Block::bordered()
            .title(title)
            .border_style(self.theme.muted())
    }

    fn toggle_button(&self) -> Paragraph<'static> {
        let (text, style) = if !self.controller.has_player() {
            ("unavailable", self.theme.muted())
        } else if self.controller.screen().toggle_selected {
            ("⏸ pause", self.theme.accent().add_modifier(Modifier::BOLD))
        } else {
            ("▶ play", self.theme.base())
        };
        Paragraph::new(text).centered().style(style).block(
            Block::bordered().border_style(if self.controller.screen().toggle_selected {
                self.theme.accent()
            } else {
                self.theme.muted()
            }),
        )
    }

    fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            // "finished" notifications from the audio thread
            while let Ok(event) = self.events_rx.try_recv() {
                self.controller.handle_event(event);
            }

            let timeout = self
                .controller
                .time_until_tick(Instant::now())
                .map_or(IDLE_POLL, |t| t.min(IDLE_POLL));
            if poll(timeout)? && !self.handle_event(read()?) {
                break;
            }

            self.controller.poll_tick(Instant::now());
        }
        self.controller.shutdown();
        info!("player screen closed");
        Ok(())
    }

    /// Returns `false` when the user asked to quit.
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                true
            }
            _ => true,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return true;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char(' ') | KeyCode::Enter => self.controller.toggle_pressed(Instant::now()),
            KeyCode::Left => self.controller.nudge(-self.seek_step),
            KeyCode::Right => self.controller.nudge(self.seek_step),
            _ => (),
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.slider_area.contains(pos) {
                    let value = self.value_at_column(mouse.column);
                    self.controller.slider_pressed(value);
                } else if self.toggle_area.contains(pos) {
                    self.controller.toggle_pressed(Instant::now());
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let value = self.value_at_column(mouse.column);
                self.controller.slider_dragged(value);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let value = self.value_at_column(mouse.column);
                self.controller.slider_released(value);
            }
            _ => (),
        }
    }

    /// Maps a terminal column onto the slider's range, clamping outside the track.
    fn value_at_column(&self, column: u16) -> f64 {
        let track = self.slider_track;
        let max = self.controller.screen().slider.max();
        if track.width <= 1 {
            return 0.0;
        }
        let offset = column.saturating_sub(track.x).min(track.width - 1);
        f64::from(offset) / f64::from(track.width - 1) * max
    }

    fn centered(area: Rect, width: u16) -> Rect {
        let [area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}

pub fn run<P: AudioPlayer>(
    controller: PlaybackController<P>,
    events_rx: Receiver<PlayerEvent>,
    theme: Theme,
    asset: String,
    seek_step: f64,
) -> Result<()> {
    let terminal = ratatui::init();
    if let Err(err) = execute!(stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(err.into());
    }
    // the app owns the output stream, drop it only after the terminal is restored
    let mut app = App::new(controller, events_rx, theme, asset, seek_step);
    let app_result = app.run(terminal);
    // best effort, the terminal is being torn down either way
    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    drop(app);
    app_result
}
