pub mod qualification;
