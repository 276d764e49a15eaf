fn main() {
    supervisor_frontend::start();
}
