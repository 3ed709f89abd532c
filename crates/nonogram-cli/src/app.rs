//! Interactive play-session state.

use crate::storage::FileStorage;
use crossterm::event::{KeyCode, KeyEvent};
use nonogram_core::{GameSession, GridError, Intent, Task, Toggle};
use std::time::Instant;

/// What the main loop should do after a key.
pub enum AppAction {
    Continue,
    Quit,
}

pub struct App {
    session: GameSession<FileStorage>,
    cursor: (usize, usize),
    start: Instant,
    hints_used: usize,
    message: Option<String>,
}

impl App {
    pub fn new(task: Task, store: FileStorage) -> Result<Self, GridError> {
        let session = GameSession::new(task, store)?;
        let message = if session.game_completed() {
            Some("Already solved — press r to play again".to_string())
        } else {
            None
        };
        Ok(Self {
            session,
            cursor: (0, 0),
            start: Instant::now(),
            hints_used: 0,
            message,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,

            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),

            KeyCode::Char(' ') | KeyCode::Enter => self.toggle(Intent::Primary),
            KeyCode::Char('x') => self.toggle(Intent::Secondary),

            KeyCode::Char('!') => self.hint(),
            KeyCode::Char('r') => self.restart(),

            _ => {}
        }
        AppAction::Continue
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_x = self.session.width().saturating_sub(1) as i32;
        let max_y = self.session.height().saturating_sub(1) as i32;
        let x = (self.cursor.0 as i32 + dx).clamp(0, max_x) as usize;
        let y = (self.cursor.1 as i32 + dy).clamp(0, max_y) as usize;
        self.cursor = (x, y);
    }

    fn toggle(&mut self, intent: Intent) {
        if self.solved() {
            self.message = Some("Already solved — press r to play again".to_string());
            return;
        }
        let Some(index) = self.session.index_of(self.cursor.0, self.cursor.1) else {
            return;
        };
        if let Toggle::Applied { win: true } = self.session.toggle_cell(index, intent) {
            self.record_win();
        }
    }

    fn hint(&mut self) {
        if self.solved() {
            return;
        }
        match self.session.apply_hint() {
            Some(_) => {
                self.hints_used += 1;
                self.message = Some("Hint applied".to_string());
            }
            None => self.message = Some("No hint available".to_string()),
        }
    }

    fn restart(&mut self) {
        self.session.restart();
        self.start = Instant::now();
        self.hints_used = 0;
        self.message = Some("Restarted".to_string());
    }

    fn record_win(&mut self) {
        let time = format_time(self.start.elapsed().as_secs());
        let stars = self.stars();
        self.session.record_completion(time.clone(), stars);
        self.message = Some(format!("Solved in {}!", time));
    }

    /// Star rating by hint count: untouched solves earn all three.
    fn stars(&self) -> u32 {
        match self.hints_used {
            0 => 3,
            1 | 2 => 2,
            _ => 1,
        }
    }

    pub fn solved(&self) -> bool {
        self.session.is_win() || self.session.game_completed()
    }

    pub fn session(&self) -> &GameSession<FileStorage> {
        &self.session
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn elapsed_string(&self) -> String {
        format_time(self.start.elapsed().as_secs())
    }
}

/// Format seconds as MM:SS or H:MM:SS.
pub fn format_time(secs: u64) -> String {
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let secs = secs % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::path::PathBuf;

    fn temp_store(name: &str) -> (FileStorage, PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "nonogram-app-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        (FileStorage::open(path.clone()), path)
    }

    fn diagonal() -> Task {
        Task {
            id: 77,
            name: "Diagonal".into(),
            task: vec![true, false, false, true],
            width: 2,
            height: 2,
            image_preview: String::new(),
            image_solved: String::new(),
        }
    }

    fn press(app: &mut App, code: KeyCode) -> AppAction {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_cursor_clamps_to_board() {
        let (store, path) = temp_store("cursor");
        let mut app = App::new(diagonal(), store).unwrap();
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor(), (0, 0));
        for _ in 0..5 {
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.cursor(), (1, 1));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_play_to_win_records_progress() {
        let (store, path) = temp_store("win");
        let mut app = App::new(diagonal(), store).unwrap();

        press(&mut app, KeyCode::Char(' ')); // paint (0, 0)
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('x')); // mark (1, 0), harmless
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' ')); // paint (1, 1)

        assert!(app.solved());
        let record = app.session().progress();
        assert!(record.game_completed);
        assert_eq!(record.stars, 3);

        // Solved sessions ignore further paints.
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.solved());

        // Restart wipes the grid but not the record.
        press(&mut app, KeyCode::Char('r'));
        assert!(!app.solved());
        assert!(app.session().progress().game_completed);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_hint_costs_a_star() {
        let (store, path) = temp_store("hint");
        let mut app = App::new(diagonal(), store).unwrap();
        press(&mut app, KeyCode::Char('!'));
        assert_eq!(app.hints_used(), 1);
        assert_eq!(app.stars(), 2);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_quit_keys() {
        let (store, path) = temp_store("quit");
        let mut app = App::new(diagonal(), store).unwrap();
        assert!(matches!(press(&mut app, KeyCode::Char('q')), AppAction::Quit));
        assert!(matches!(press(&mut app, KeyCode::Esc), AppAction::Quit));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(95), "01:35");
        assert_eq!(format_time(3700), "1:01:40");
    }
}
