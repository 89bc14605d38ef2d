fn main() {
    attendq::app::startup::startup();
}
