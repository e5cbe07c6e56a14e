pub mod computer_vision;
