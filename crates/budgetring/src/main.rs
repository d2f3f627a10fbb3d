use budgetring::config;
use budgetring::gui::app::AppModel;
use budgetring::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx.clone());

    let app = RelmApp::new("org.budgetring.BudgetRing");

    app.run::<AppModel>((config, tx, rx));
}
