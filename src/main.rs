fn main() -> Result<(), Box<dyn std::error::Error>> {
    mythicard::cli::main()
}
