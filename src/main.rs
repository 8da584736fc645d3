fn main() {
    fever_hand::game::run();
}
