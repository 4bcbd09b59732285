
// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the codec:
// - round_trip: decoding an encoded schedule gives the schedule back
// - smoke_tests: end-to-end scenarios through the public API and commands
