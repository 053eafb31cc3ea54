use tsp_two_opt::solver::two_opt::search;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    search::run()
}
