fn main() {
    env_logger::init();
    log::info!("Chess move engine - terminal");
    chess_move_engine::mock::run_interactive_terminal();
}
