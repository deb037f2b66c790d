fn main() {
    tubefetch_lib::run()
}
