use ringchart::{CategoryId, Command, MotionMode};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Show,
    Hide,
    Select(CategoryId),
    Motion(MotionMode),
    ConfigReload,
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Show => AppEvent::Show,
            Command::Hide => AppEvent::Hide,
            Command::Reload => AppEvent::ConfigReload,
            Command::Select(id) => AppEvent::Select(id),
            Command::Motion(mode) => AppEvent::Motion(mode),
        }
    }
}
