mod browse_flow_tests;
