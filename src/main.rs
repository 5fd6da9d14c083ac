fn main() -> anyhow::Result<()> {
    product_rec_agent_lib::run()
}
