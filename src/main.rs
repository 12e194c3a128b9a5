use barrage::entry;
use barrage::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
