fn main() {
  mira::main();
}
