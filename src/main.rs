use nodebench::error::AppResult;

fn main() -> AppResult<()> {
    nodebench::entry::run()
}
